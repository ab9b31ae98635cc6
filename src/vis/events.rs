use serde::{Deserialize, Serialize};

use super::VisContext;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisEventKind {
    Data,
    Resize,
}

/// Notification fired synchronously by `set_data` and `resize`.
#[derive(Debug)]
pub enum VisEvent<'a, T> {
    Data(&'a [T]),
    Resize { width: f64, height: f64 },
}

impl<T> VisEvent<'_, T> {
    #[must_use]
    pub fn kind(&self) -> VisEventKind {
        match self {
            Self::Data(_) => VisEventKind::Data,
            Self::Resize { .. } => VisEventKind::Resize,
        }
    }
}

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

pub(crate) type Handler<T> = Box<dyn FnMut(&VisEvent<'_, T>, &VisContext<'_, T>)>;

struct Subscription<T> {
    id: SubscriptionId,
    kind: VisEventKind,
    handler: Handler<T>,
}

/// Ordered handler list; handlers for one event run in subscription order.
pub(crate) struct EventDispatcher<T> {
    next_id: u64,
    subscriptions: Vec<Subscription<T>>,
}

impl<T> Default for EventDispatcher<T> {
    fn default() -> Self {
        Self {
            next_id: 0,
            subscriptions: Vec::new(),
        }
    }
}

impl<T> EventDispatcher<T> {
    pub(crate) fn subscribe(&mut self, kind: VisEventKind, handler: Handler<T>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription { id, kind, handler });
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    pub(crate) fn count(&self, kind: VisEventKind) -> usize {
        self.subscriptions
            .iter()
            .filter(|subscription| subscription.kind == kind)
            .count()
    }

    pub(crate) fn emit(&mut self, event: &VisEvent<'_, T>, context: &VisContext<'_, T>) {
        let kind = event.kind();
        for subscription in &mut self.subscriptions {
            if subscription.kind == kind {
                (subscription.handler)(event, context);
            }
        }
    }
}
