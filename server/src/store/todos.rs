use protocol::{FieldMap, Todo};

use super::validation::{validate, Intent, TodoDraft};

const SEED_TODOS: [&str; 10] = [
    "scan paperwork",
    "file paperwork",
    "process payments",
    "escalate late payments",
    "pay invoices",
    "process payroll",
    "train staff",
    "schedule meeting",
    "tidy meeting room",
    "install webcam",
];

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
    #[error("{}", .0.join("; "))]
    Validation(Vec<String>),

    #[error("todo {0} not found")]
    NotFound(u64),
}

/// Todos of a single challenger session, kept in insertion order.
#[derive(Debug, Clone)]
pub struct TodoStore {
    todos: Vec<Todo>,
    next_id: u64,
    capacity: usize,
}

impl TodoStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            todos: Vec::with_capacity(capacity),
            next_id: 1,
            capacity,
        }
    }

    /// A store pre-filled with the example todos, ids starting at 1.
    pub fn seeded(capacity: usize) -> Self {
        let mut store = Self::new(capacity);
        for title in SEED_TODOS.iter().take(capacity) {
            let seeded = store.insert(TodoDraft {
                title: Some(title.to_string()),
                ..TodoDraft::default()
            });
            if seeded.is_err() {
                break;
            }
        }
        store
    }

    pub fn len(&self) -> usize {
        self.todos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.todos.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.todos.len() >= self.capacity
    }

    pub fn todos(&self) -> &[Todo] {
        &self.todos
    }

    pub fn list(&self, done_status: Option<bool>) -> Vec<Todo> {
        self.todos
            .iter()
            .filter(|todo| done_status.map_or(true, |done| todo.done_status == done))
            .cloned()
            .collect()
    }

    pub fn get(&self, id: u64) -> Option<&Todo> {
        self.todos.iter().find(|todo| todo.id == id)
    }

    fn position(&self, id: u64) -> Option<usize> {
        self.todos.iter().position(|todo| todo.id == id)
    }

    fn insert(&mut self, draft: TodoDraft) -> Result<Todo, StoreError> {
        let Some(next_id) = self.next_id.checked_add(1) else {
            log::warn!("Todo ids exhausted at {}", self.next_id);
            return Err(StoreError::Validation(vec![
                "ERROR: Cannot add instance, no todo ids left".to_string(),
            ]));
        };

        let todo = Todo::new(
            self.next_id,
            draft.title.unwrap_or_default(),
            draft.done_status.unwrap_or(false),
            draft.description.unwrap_or_default(),
        );
        self.next_id = next_id;
        self.todos.push(todo.clone());
        Ok(todo)
    }

    pub fn create(&mut self, fields: &FieldMap) -> Result<Todo, StoreError> {
        let validated = validate(fields, Intent::Create);

        if self.is_full() {
            let mut errors = validated.err().unwrap_or_default();
            errors.push(format!(
                "ERROR: Cannot add instance, maximum limit of {} reached",
                self.capacity
            ));
            log::info!("Rejected todo creation at capacity {}", self.capacity);
            return Err(StoreError::Validation(errors));
        }

        let draft = validated.map_err(StoreError::Validation)?;
        self.insert(draft)
    }

    /// Full update. Fields missing from the payload fall back to their
    /// defaults. A missing target cannot be created this way because ids are
    /// assigned by the server.
    pub fn replace(&mut self, id: u64, fields: &FieldMap) -> Result<Todo, StoreError> {
        let Some(index) = self.position(id) else {
            return Err(StoreError::Validation(vec![
                "Cannot create todo with PUT due to Auto fields id".to_string(),
            ]));
        };

        let draft = validate(fields, Intent::Replace { id }).map_err(StoreError::Validation)?;
        let todo = &mut self.todos[index];
        todo.title = draft.title.unwrap_or_default();
        todo.done_status = draft.done_status.unwrap_or(false);
        todo.description = draft.description.unwrap_or_default();
        Ok(todo.clone())
    }

    /// Partial update: only supplied fields are validated and applied.
    pub fn amend(&mut self, id: u64, fields: &FieldMap) -> Result<Todo, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;

        let draft = validate(fields, Intent::Amend { id }).map_err(StoreError::Validation)?;
        let todo = &mut self.todos[index];
        if let Some(title) = draft.title {
            todo.title = title;
        }
        if let Some(done_status) = draft.done_status {
            todo.done_status = done_status;
        }
        if let Some(description) = draft.description {
            todo.description = description;
        }
        Ok(todo.clone())
    }

    pub fn delete(&mut self, id: u64) -> Result<Todo, StoreError> {
        let index = self.position(id).ok_or(StoreError::NotFound(id))?;
        Ok(self.todos.remove(index))
    }

    /// Replaces the whole collection. Nothing changes unless every entry is
    /// valid.
    pub fn replace_all(&mut self, entries: &[FieldMap]) -> Result<(), StoreError> {
        let mut errors = Vec::new();
        let mut todos: Vec<Todo> = Vec::with_capacity(entries.len());

        if entries.len() > self.capacity {
            errors.push(format!(
                "ERROR: Cannot add instance, maximum limit of {} reached",
                self.capacity
            ));
        }

        for fields in entries {
            match validate(fields, Intent::Restore) {
                Ok(draft) => {
                    let Some(id) = draft.id else { continue };
                    if todos.iter().any(|todo| todo.id == id) {
                        errors.push(format!("Duplicate todo id: {}", id));
                        continue;
                    }
                    todos.push(Todo::new(
                        id,
                        draft.title.unwrap_or_default(),
                        draft.done_status.unwrap_or(false),
                        draft.description.unwrap_or_default(),
                    ));
                }
                Err(messages) => errors.extend(messages),
            }
        }

        if !errors.is_empty() {
            return Err(StoreError::Validation(errors));
        }

        // Restored ids are below u64::MAX, checked per entry.
        let highest = todos.iter().map(|todo| todo.id).max().unwrap_or(0);
        self.next_id = self.next_id.max(highest.saturating_add(1));
        self.todos = todos;
        Ok(())
    }
}
