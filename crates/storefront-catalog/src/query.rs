//! Builder for the backend's PostgREST-style table queries.
//!
//! Filters render as `column=operator.value` query pairs:
//!
//! | Builder call              | Query pair                    |
//! |---------------------------|-------------------------------|
//! | `eq("slug", "box")`       | `slug=eq.box`                 |
//! | `ilike_contains("title", "box")` | `title=ilike.*box*`    |
//! | `in_list("id", &[a, b])`  | `id=in.(a,b)`                 |
//! | `order("created_at", false)` | `order=created_at.desc`    |
//! | `limit(5)`                | `limit=5`                     |

use std::fmt::Display;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query {
    table: String,
    pairs: Vec<(String, String)>,
}

impl Query {
    /// Starts a query against `table` selecting every column.
    #[must_use]
    pub fn table(table: &str) -> Self {
        Self {
            table: table.to_owned(),
            pairs: vec![("select".to_owned(), "*".to_owned())],
        }
    }

    /// Replaces the selected columns, e.g. `"*,customers(first_name,email)"`
    /// to embed a related row by foreign key.
    #[must_use]
    pub fn select(mut self, columns: &str) -> Self {
        self.pairs.retain(|(k, _)| k != "select");
        self.pairs.insert(0, ("select".to_owned(), columns.to_owned()));
        self
    }

    #[must_use]
    pub fn eq(mut self, column: &str, value: impl Display) -> Self {
        self.pairs.push((column.to_owned(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive substring match. Wildcard characters in `needle`
    /// are dropped so shopper input cannot widen the pattern.
    #[must_use]
    pub fn ilike_contains(mut self, column: &str, needle: &str) -> Self {
        let cleaned: String = needle
            .trim()
            .chars()
            .filter(|c| *c != '*' && *c != '%')
            .collect();
        self.pairs
            .push((column.to_owned(), format!("ilike.*{cleaned}*")));
        self
    }

    /// Membership filter. Values containing list syntax are double-quoted.
    #[must_use]
    pub fn in_list<T: Display>(mut self, column: &str, values: &[T]) -> Self {
        let rendered = values
            .iter()
            .map(|v| quote_list_value(&v.to_string()))
            .collect::<Vec<_>>()
            .join(",");
        self.pairs.push((column.to_owned(), format!("in.({rendered})")));
        self
    }

    #[must_use]
    pub fn order(mut self, column: &str, ascending: bool) -> Self {
        let direction = if ascending { "asc" } else { "desc" };
        self.pairs
            .push(("order".to_owned(), format!("{column}.{direction}")));
        self
    }

    #[must_use]
    pub fn limit(mut self, limit: usize) -> Self {
        self.pairs.retain(|(k, _)| k != "limit");
        self.pairs.push(("limit".to_owned(), limit.to_string()));
        self
    }

    #[must_use]
    pub fn table_name(&self) -> &str {
        &self.table
    }

    #[must_use]
    pub fn pairs(&self) -> &[(String, String)] {
        &self.pairs
    }
}

fn quote_list_value(value: &str) -> String {
    if value.contains([',', '(', ')', '"', ' ']) {
        format!("\"{}\"", value.replace('"', "\\\""))
    } else {
        value.to_owned()
    }
}
