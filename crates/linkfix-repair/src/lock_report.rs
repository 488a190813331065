//! Report of items that could not be patched because they are locked

use linkfix_domain::traits::ItemRepository;
use linkfix_domain::{LockedItemRow, UserId};
use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::fmt::Display;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Header row of the exported CSV
pub const LOCK_REPORT_HEADER: &str = "Document Key,Locked By,Item URL";

/// Locked items, unique by document key, in the order they were found
///
/// # Examples
///
/// ```
/// use linkfix_domain::LockedItemRow;
/// use linkfix_repair::LockReport;
///
/// let mut report = LockReport::new();
/// let row = LockedItemRow {
///     document_key: "REQ-1".to_string(),
///     locked_by: "Ada Lovelace".to_string(),
///     item_url: "https://h/perspective.req#/items/1?projectId=7".to_string(),
/// };
/// assert!(report.add(row.clone()));
/// assert!(!report.add(row));
/// assert_eq!(report.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LockReport {
    rows: Vec<LockedItemRow>,
    keys: HashSet<String>,
}

impl LockReport {
    /// Create an empty report
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a row unless its document key is already reported
    ///
    /// Returns whether the row was added. The first row for a key wins.
    pub fn add(&mut self, row: LockedItemRow) -> bool {
        if !self.keys.insert(row.document_key.clone()) {
            return false;
        }
        self.rows.push(row);
        true
    }

    /// Rows in insertion order
    pub fn rows(&self) -> &[LockedItemRow] {
        &self.rows
    }

    /// Number of rows
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether no item was reported
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Write the report as CSV
    ///
    /// The owner column is a `HYPERLINK` formula so spreadsheets render the
    /// owner name as a link to the item.
    pub fn write_csv<W: Write>(&self, mut writer: W) -> io::Result<()> {
        writeln!(writer, "{}", LOCK_REPORT_HEADER)?;
        for row in &self.rows {
            let formula = format!(
                "=HYPERLINK(\"{}\",\"{}\")",
                row.item_url.replace('"', "\"\""),
                row.locked_by.replace('"', "\"\"")
            );
            writeln!(
                writer,
                "{},{},{}",
                csv_field(&row.document_key),
                csv_field(&formula),
                csv_field(&row.item_url)
            )?;
        }
        writer.flush()
    }

    /// Write the report to a file, replacing any previous content
    pub fn save(&self, path: &Path) -> io::Result<()> {
        let file = File::create(path)?;
        self.write_csv(BufWriter::new(file))
    }
}

fn csv_field(value: &str) -> String {
    if value.contains([',', '"', '\n', '\r']) {
        format!("\"{}\"", value.replace('"', "\"\""))
    } else {
        value.to_string()
    }
}

/// Display names of lock owners, fetched once per user
pub struct OwnerDirectory<'a, R> {
    repository: &'a R,
    names: RefCell<HashMap<UserId, String>>,
}

impl<'a, R> OwnerDirectory<'a, R>
where
    R: ItemRepository,
    R::Error: Display,
{
    /// Create a directory with an empty cache
    pub fn new(repository: &'a R) -> Self {
        Self {
            repository,
            names: RefCell::new(HashMap::new()),
        }
    }

    /// Name of the lock owner
    ///
    /// Falls back to `user <id>` when the account cannot be read and to
    /// `unknown` when the owner is not known at all.
    pub fn name_of(&self, owner: Option<UserId>) -> String {
        let Some(user) = owner else {
            return "unknown".to_string();
        };
        if let Some(name) = self.names.borrow().get(&user) {
            return name.clone();
        }

        let name = match self.repository.get_user(user) {
            Ok(account) if !account.display_name().is_empty() => account.display_name(),
            Ok(_) => format!("user {}", user),
            Err(e) => {
                tracing::warn!("Could not read user [{}]: {}", user, e);
                format!("user {}", user)
            }
        };
        self.names.borrow_mut().insert(user, name.clone());
        name
    }
}
