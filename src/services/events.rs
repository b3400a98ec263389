//! Queue lifecycle events.
//!
//! Listeners are registered per event kind and run synchronously, in
//! subscription order, inside the call that triggered the event. A listener
//! must not call back into the `FileQueueManager` that emitted the event.

use std::collections::HashMap;
use std::rc::Rc;
use std::sync::Arc;

use crate::models::queued::QueuedFile;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum QueueEventKind {
    FileAdded,
    FileRemoved,
    FilesChanged,
}

impl QueueEventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            QueueEventKind::FileAdded => "fileadded",
            QueueEventKind::FileRemoved => "fileremoved",
            QueueEventKind::FilesChanged => "fileschanged",
        }
    }
}

#[derive(Debug, Clone)]
pub enum QueueEvent {
    FileAdded(Arc<QueuedFile>),
    FileRemoved(Arc<QueuedFile>),
    /// Snapshot of the whole queue after the change.
    FilesChanged(Vec<Arc<QueuedFile>>),
}

impl QueueEvent {
    pub fn kind(&self) -> QueueEventKind {
        match self {
            QueueEvent::FileAdded(_) => QueueEventKind::FileAdded,
            QueueEvent::FileRemoved(_) => QueueEventKind::FileRemoved,
            QueueEvent::FilesChanged(_) => QueueEventKind::FilesChanged,
        }
    }
}

pub type Listener = Rc<dyn Fn(&QueueEvent)>;

pub fn listener(f: impl Fn(&QueueEvent) + 'static) -> Listener {
    Rc::new(f)
}

#[derive(Default)]
pub struct EventEmitter {
    listeners: HashMap<QueueEventKind, Vec<Listener>>,
}

impl EventEmitter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn on(&mut self, kind: QueueEventKind, listener: Listener) {
        self.listeners.entry(kind).or_default().push(listener);
    }

    /// Removes the first registration of this exact listener.
    pub fn off(&mut self, kind: QueueEventKind, listener: &Listener) -> bool {
        let Some(list) = self.listeners.get_mut(&kind) else {
            return false;
        };
        match list.iter().position(|l| same_listener(l, listener)) {
            Some(pos) => {
                list.remove(pos);
                true
            }
            None => false,
        }
    }

    pub fn emit(&self, event: &QueueEvent) {
        let kind = event.kind();
        if let Some(list) = self.listeners.get(&kind) {
            log::trace!("Emitting {} to {} listener(s)", kind.as_str(), list.len());
            for listener in list {
                listener(event);
            }
        }
    }

    pub fn listener_count(&self, kind: QueueEventKind) -> usize {
        self.listeners.get(&kind).map_or(0, Vec::len)
    }
}

// Compare data pointers only; vtable pointers may differ across codegen units.
fn same_listener(a: &Listener, b: &Listener) -> bool {
    std::ptr::eq(Rc::as_ptr(a) as *const (), Rc::as_ptr(b) as *const ())
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::models::file::RawFile;

    fn entry() -> Arc<QueuedFile> {
        Arc::new(QueuedFile::valid(RawFile::new("a.txt", "text/plain", b"a".to_vec())))
    }

    #[test]
    fn listeners_run_in_subscription_order() {
        let log = Rc::new(RefCell::new(Vec::new()));
        let mut emitter = EventEmitter::new();
        for tag in ["first", "second", "third"] {
            let log = log.clone();
            emitter.on(
                QueueEventKind::FileAdded,
                listener(move |_| log.borrow_mut().push(tag)),
            );
        }

        emitter.emit(&QueueEvent::FileAdded(entry()));
        assert_eq!(*log.borrow(), vec!["first", "second", "third"]);
    }

    #[test]
    fn emit_only_reaches_matching_kind() {
        let hits = Rc::new(RefCell::new(0));
        let mut emitter = EventEmitter::new();
        let h = hits.clone();
        emitter.on(
            QueueEventKind::FileRemoved,
            listener(move |_| *h.borrow_mut() += 1),
        );

        emitter.emit(&QueueEvent::FileAdded(entry()));
        emitter.emit(&QueueEvent::FilesChanged(vec![]));
        assert_eq!(*hits.borrow(), 0);

        emitter.emit(&QueueEvent::FileRemoved(entry()));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn off_removes_first_matching_reference_only() {
        let hits = Rc::new(RefCell::new(0));
        let h = hits.clone();
        let counter = listener(move |_| *h.borrow_mut() += 1);

        let mut emitter = EventEmitter::new();
        emitter.on(QueueEventKind::FilesChanged, counter.clone());
        emitter.on(QueueEventKind::FilesChanged, counter.clone());
        assert_eq!(emitter.listener_count(QueueEventKind::FilesChanged), 2);

        assert!(emitter.off(QueueEventKind::FilesChanged, &counter));
        assert_eq!(emitter.listener_count(QueueEventKind::FilesChanged), 1);

        emitter.emit(&QueueEvent::FilesChanged(vec![]));
        assert_eq!(*hits.borrow(), 1);
    }

    #[test]
    fn off_with_unknown_listener_is_noop() {
        let mut emitter = EventEmitter::new();
        let registered = listener(|_| {});
        let other = listener(|_| {});
        emitter.on(QueueEventKind::FileAdded, registered);

        assert!(!emitter.off(QueueEventKind::FileAdded, &other));
        assert!(!emitter.off(QueueEventKind::FileRemoved, &other));
        assert_eq!(emitter.listener_count(QueueEventKind::FileAdded), 1);
    }

    #[test]
    fn kind_names() {
        assert_eq!(QueueEventKind::FileAdded.as_str(), "fileadded");
        assert_eq!(QueueEventKind::FileRemoved.as_str(), "fileremoved");
        assert_eq!(QueueEventKind::FilesChanged.as_str(), "fileschanged");
    }
}
