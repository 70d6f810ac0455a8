//! Client-side editing of one todo list with optimistic updates.
//!
//! A [`TodoSession`] holds the displayed items. Each change is applied locally
//! first, then the full resulting sequence is sent to the server. If the write
//! fails the change is undone and the error is kept for display. Dropping a
//! mutation future before the server answers undoes the change as well.

use std::fmt;

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::error::{TodoListError, TodoListResult};
use crate::models::{TodoItem, TodoListView};

/// Server operations a session needs
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait TodoListClient: Send + Sync {
    async fn get_todo_list(&self, list_id: &str) -> TodoListResult<TodoListView>;

    async fn update_todo_items(&self, list_id: &str, items: Vec<TodoItem>) -> TodoListResult<()>;
}

type Rollback = Box<dyn FnOnce(&mut Vec<TodoItem>) + Send>;

/// A local change awaiting server confirmation.
///
/// Carries the full item sequence to persist and the inverse of the change.
struct PendingMutation {
    items: Vec<TodoItem>,
    rollback: Rollback,
}

impl fmt::Debug for PendingMutation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PendingMutation")
            .field("items", &self.items)
            .finish_non_exhaustive()
    }
}

pub struct TodoSession<C: TodoListClient> {
    client: C,
    list_id: String,
    name: String,
    items: Vec<TodoItem>,
    draft: String,
    in_flight: bool,
    last_error: Option<String>,
}

impl<C: TodoListClient> TodoSession<C> {
    /// Load the list and start a session on it.
    pub async fn open(client: C, list_id: impl Into<String>) -> TodoListResult<Self> {
        let list_id = list_id.into();
        let view = client.get_todo_list(&list_id).await?;

        Ok(Self {
            client,
            list_id,
            name: view.name,
            items: view.items,
            draft: String::new(),
            in_flight: false,
            last_error: None,
        })
    }

    pub fn list_id(&self) -> &str {
        &self.list_id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Items as currently displayed, including unconfirmed changes
    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn draft(&self) -> &str {
        &self.draft
    }

    pub fn set_draft(&mut self, text: impl Into<String>) {
        self.draft = text.into();
    }

    /// True while a mutation awaits confirmation
    pub fn is_busy(&self) -> bool {
        self.in_flight
    }

    /// Message of the most recent failed write
    pub fn last_error(&self) -> Option<&str> {
        self.last_error.as_deref()
    }

    /// Stage appending `item`. Merging is skipped when an item with the same
    /// id is already displayed.
    fn begin_add(&mut self, item: TodoItem) -> TodoListResult<PendingMutation> {
        self.ensure_idle()?;
        if item.name.trim().is_empty() {
            return Err(TodoListError::Validation(
                "Todo item name must not be empty".to_string(),
            ));
        }

        let rollback: Rollback = if self.items.iter().any(|i| i.id == item.id) {
            debug!(item_id = %item.id, "Item already present, skipping merge");
            Box::new(|_: &mut Vec<TodoItem>| {})
        } else {
            let id = item.id.clone();
            self.items.push(item);
            Box::new(move |items: &mut Vec<TodoItem>| items.retain(|i| i.id != id))
        };

        Ok(self.stage(rollback))
    }

    /// Stage flipping `completed` on the item with `item_id`.
    fn begin_toggle(&mut self, item_id: &str) -> TodoListResult<PendingMutation> {
        self.ensure_idle()?;

        let item = self
            .items
            .iter_mut()
            .find(|i| i.id == item_id)
            .ok_or_else(|| TodoListError::NotFound(format!("Todo item {} not found", item_id)))?;

        let previous = item.completed;
        item.completed = !previous;

        let id = item_id.to_string();
        Ok(self.stage(Box::new(move |items: &mut Vec<TodoItem>| {
            if let Some(item) = items.iter_mut().find(|i| i.id == id) {
                item.completed = previous;
            }
        })))
    }

    /// Record the server's answer for `pending`, undoing it on failure.
    fn settle(&mut self, pending: PendingMutation, result: TodoListResult<()>) -> TodoListResult<()> {
        self.in_flight = false;

        match result {
            Ok(()) => {
                self.last_error = None;
                Ok(())
            }
            Err(e) => {
                warn!(list_id = %self.list_id, error = %e, "Rolling back todo change");
                (pending.rollback)(&mut self.items);
                self.last_error = Some(e.to_string());
                Err(e)
            }
        }
    }

    /// Add an item named `text` and persist it.
    pub async fn add_item(&mut self, text: &str) -> TodoListResult<()> {
        let pending = self.begin_add(TodoItem::new(text.trim()))?;
        self.commit(pending).await
    }

    /// Add the draft as a new item. The draft is cleared once the item is
    /// staged, whether or not the write then succeeds.
    pub async fn submit_draft(&mut self) -> TodoListResult<()> {
        let pending = self.begin_add(TodoItem::new(self.draft.trim()))?;
        self.draft.clear();
        self.commit(pending).await
    }

    pub async fn toggle_item(&mut self, item_id: &str) -> TodoListResult<()> {
        let pending = self.begin_toggle(item_id)?;
        self.commit(pending).await
    }

    /// Replace displayed items with the server's current state.
    pub async fn refresh(&mut self) -> TodoListResult<()> {
        self.ensure_idle()?;
        let view = self.client.get_todo_list(&self.list_id).await?;
        self.name = view.name;
        self.items = view.items;
        Ok(())
    }

    async fn commit(&mut self, pending: PendingMutation) -> TodoListResult<()> {
        let items = pending.items.clone();
        let guard = InFlight {
            session: self,
            pending: Some(pending),
        };
        let result = guard
            .session
            .client
            .update_todo_items(&guard.session.list_id, items)
            .await;
        guard.finish(result)
    }

    fn ensure_idle(&self) -> TodoListResult<()> {
        if self.in_flight {
            return Err(TodoListError::Busy);
        }
        Ok(())
    }

    fn stage(&mut self, rollback: Rollback) -> PendingMutation {
        self.in_flight = true;
        PendingMutation {
            items: self.items.clone(),
            rollback,
        }
    }
}

/// Undoes a staged mutation if the commit future is dropped before the
/// server answers.
struct InFlight<'a, C: TodoListClient> {
    session: &'a mut TodoSession<C>,
    pending: Option<PendingMutation>,
}

impl<C: TodoListClient> InFlight<'_, C> {
    fn finish(mut self, result: TodoListResult<()>) -> TodoListResult<()> {
        match self.pending.take() {
            Some(pending) => self.session.settle(pending, result),
            None => result,
        }
    }
}

impl<C: TodoListClient> Drop for InFlight<'_, C> {
    fn drop(&mut self) {
        if let Some(pending) = self.pending.take() {
            warn!(list_id = %self.session.list_id, "Todo change cancelled before confirmation");
            (pending.rollback)(&mut self.session.items);
            self.session.in_flight = false;
        }
    }
}
