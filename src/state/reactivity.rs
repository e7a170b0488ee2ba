// ============================================================================
// REACTIVITY - Sistema de notificaciones/subscribers para reactividad
// ============================================================================

use std::cell::RefCell;
use std::rc::Rc;

type Callback<T> = Rc<dyn Fn(&T)>;

/// Estado reactivo con sistema de notificaciones
///
/// Los subscribers reciben una copia del valor y se notifican sobre una copia de
/// la lista, así que desde el callback se puede modificar el estado o
/// suscribirse sin conflicto de borrows.
pub struct ReactiveState<T: Clone> {
    value: Rc<RefCell<T>>,
    subscribers: Rc<RefCell<Vec<Callback<T>>>>,
}

impl<T: Clone> ReactiveState<T> {
    /// Crear nuevo estado reactivo
    pub fn new(value: T) -> Self {
        Self {
            value: Rc::new(RefCell::new(value)),
            subscribers: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Copia del valor actual
    pub fn value(&self) -> T {
        self.value.borrow().clone()
    }

    /// Establecer nuevo valor y notificar subscribers
    pub fn set(&self, new_value: T) {
        *self.value.borrow_mut() = new_value;
        self.notify();
    }

    /// Suscribirse a cambios
    pub fn subscribe<F>(&self, callback: F)
    where
        F: Fn(&T) + 'static,
    {
        self.subscribers.borrow_mut().push(Rc::new(callback));
    }

    /// Notificar a todos los subscribers
    ///
    /// Los que se suscriban durante la notificación reciben el siguiente cambio.
    fn notify(&self) {
        let snapshot = self.value();
        let callbacks: Vec<Callback<T>> = self.subscribers.borrow().clone();
        for callback in callbacks {
            callback(&snapshot);
        }
    }
}

impl<T: Clone> Clone for ReactiveState<T> {
    fn clone(&self) -> Self {
        Self {
            value: self.value.clone(),
            subscribers: self.subscribers.clone(),
        }
    }
}

impl<T: Clone + Default> Default for ReactiveState<T> {
    fn default() -> Self {
        Self::new(T::default())
    }
}
