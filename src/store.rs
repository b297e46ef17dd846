//! JSON-file store for the task collection.
//!
//! A thin persistence layer: one local JSON file holding the full ordered
//! task list. Absent or corrupt storage degrades to an empty collection
//! rather than failing.

use std::fs::{self, File};
use std::io::{Read, Write};
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::task::Task;

/// In-memory store for the task collection.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct Store {
    pub tasks: Vec<Task>,
}

impl Store {
    /// Load the store from a JSON file, substituting an empty collection if
    /// the file is missing, unreadable, or corrupt.
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            return Store::default();
        }
        let mut buf = String::new();
        match File::open(path).and_then(|mut f| f.read_to_string(&mut buf)) {
            Ok(_) => match serde_json::from_str(&buf) {
                Ok(store) => store,
                Err(e) => {
                    eprintln!("Error parsing store, starting fresh: {e}");
                    Store::default()
                }
            },
            Err(e) => {
                eprintln!("Error reading store, starting fresh: {e}");
                Store::default()
            }
        }
    }

    /// Save the store to a JSON file using atomic write (temp file + rename).
    pub fn save(&self, path: &Path) -> std::io::Result<()> {
        // Atomic-ish write via temp + rename.
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        let data = serde_json::to_string_pretty(self).unwrap();
        f.write_all(data.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }

    /// Generate the next available task ID.
    pub fn next_id(&self) -> u64 {
        self.tasks.iter().map(|t| t.id).max().unwrap_or(0) + 1
    }

    /// Get a task by ID.
    pub fn get(&self, id: u64) -> Option<&Task> {
        self.tasks.iter().find(|t| t.id == id)
    }

    /// Get a mutable reference to a task by ID.
    pub fn get_mut(&mut self, id: u64) -> Option<&mut Task> {
        self.tasks.iter_mut().find(|t| t.id == id)
    }

    /// Remove a task by ID. Returns whether a task was removed.
    pub fn remove(&mut self, id: u64) -> bool {
        let before = self.tasks.len();
        self.tasks.retain(|t| t.id != id);
        self.tasks.len() != before
    }

    /// Resolve a task identifier (either ID or name) to a task ID.
    /// Returns an error if the name has multiple matches and suggests using
    /// the ID instead.
    pub fn resolve(&self, identifier: &str) -> Result<u64, String> {
        // Try parsing as ID first
        if let Ok(id) = identifier.parse::<u64>() {
            if self.get(id).is_some() {
                return Ok(id);
            } else {
                return Err(format!("Task with ID {} not found", id));
            }
        }

        // Search by name (case-insensitive)
        let matches: Vec<&Task> = self
            .tasks
            .iter()
            .filter(|t| t.task_name.to_lowercase() == identifier.to_lowercase())
            .collect();

        match matches.len() {
            0 => Err(format!("No task found with name '{}'", identifier)),
            1 => Ok(matches[0].id),
            _ => {
                let mut error_msg = format!("Multiple tasks found with name '{}':\n", identifier);
                for t in matches {
                    error_msg.push_str(&format!("  ID {}: {} [{}]\n", t.id, t.task_name, t.project));
                }
                error_msg.push_str("Please use the specific ID instead.");
                Err(error_msg)
            }
        }
    }
}
