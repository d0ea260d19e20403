//! Server action demo: todo list
//!
//! The loader lists todos, the action applies one intent per submission.

use std::sync::Mutex;

use serde::Serialize;

use super::{lock, timestamp, Demos, Outcome};
use crate::error::DemoError;
use crate::http::FormData;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Todo {
    pub id: String,
    pub text: String,
    pub completed: bool,
    pub created_at: String,
}

/// Operations the todo action accepts, keyed by the `intent` field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TodoIntent {
    Add { text: String },
    Toggle { id: String },
    Delete { id: String },
    ClearCompleted,
}

impl TodoIntent {
    pub fn from_form(form: &FormData) -> Result<Self, DemoError> {
        let id = || form.get_or_empty("id").to_string();
        match form.get_or_empty("intent") {
            "add" => Ok(Self::Add {
                text: form.get_or_empty("text").to_string(),
            }),
            "toggle" => Ok(Self::Toggle { id: id() }),
            "delete" => Ok(Self::Delete { id: id() }),
            "clear-completed" => Ok(Self::ClearCompleted),
            other => Err(DemoError::UnknownOperation(other.to_string())),
        }
    }

    pub const fn tag(&self) -> &'static str {
        match self {
            Self::Add { .. } => "add",
            Self::Toggle { .. } => "toggle",
            Self::Delete { .. } => "delete",
            Self::ClearCompleted => "clear-completed",
        }
    }
}

/// Todo collection shared by every request
#[derive(Debug, Default)]
pub struct TodoStore {
    todos: Mutex<Vec<Todo>>,
}

impl TodoStore {
    /// Store holding the two starter todos
    pub fn seeded() -> Self {
        let now = timestamp();
        let seed = |id: &str, text: &str, completed: bool| Todo {
            id: id.to_string(),
            text: text.to_string(),
            completed,
            created_at: now.clone(),
        };
        Self {
            todos: Mutex::new(vec![
                seed("1", "Learn React Router v7", true),
                seed("2", "Build something awesome", false),
            ]),
        }
    }

    pub fn list(&self) -> Vec<Todo> {
        lock(&self.todos).clone()
    }

    pub fn apply(&self, intent: TodoIntent) -> Outcome {
        let operation = intent.tag();
        let mut todos = lock(&self.todos);
        match intent {
            TodoIntent::Add { text } => {
                let text = text.trim();
                if text.is_empty() {
                    return Outcome::unchanged(operation);
                }
                let todo = Todo {
                    id: uuid::Uuid::new_v4().to_string(),
                    text: text.to_string(),
                    completed: false,
                    created_at: timestamp(),
                };
                let id = todo.id.clone();
                todos.push(todo);
                Outcome::applied(operation).with("id", id)
            }
            TodoIntent::Toggle { id } => match todos.iter_mut().find(|t| t.id == id) {
                Some(todo) => {
                    todo.completed = !todo.completed;
                    Outcome::applied(operation).with("completed", todo.completed)
                }
                None => Outcome::unchanged(operation),
            },
            TodoIntent::Delete { id } => {
                let before = todos.len();
                todos.retain(|t| t.id != id);
                changed(operation, before != todos.len())
            }
            TodoIntent::ClearCompleted => {
                let before = todos.len();
                todos.retain(|t| !t.completed);
                changed(operation, before != todos.len()).with("removed", before - todos.len())
            }
        }
    }
}

fn changed(operation: &'static str, applied: bool) -> Outcome {
    if applied {
        Outcome::applied(operation)
    } else {
        Outcome::unchanged(operation)
    }
}

#[derive(Debug, Serialize)]
pub struct TodoList {
    pub todos: Vec<Todo>,
    pub pending_count: usize,
    pub completed_count: usize,
}

#[allow(clippy::unused_async)]
pub async fn loader(demos: &Demos) -> Result<TodoList, DemoError> {
    let todos = demos.todos.list();
    let completed_count = todos.iter().filter(|t| t.completed).count();
    Ok(TodoList {
        pending_count: todos.len() - completed_count,
        completed_count,
        todos,
    })
}

#[allow(clippy::unused_async)]
pub async fn action(demos: &Demos, form: &FormData) -> Result<Outcome, DemoError> {
    let intent = TodoIntent::from_form(form)?;
    Ok(demos.todos.apply(intent))
}
