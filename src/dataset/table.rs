//! Row-major table with named columns. Stages take a table by reference and return a new one.

use super::Value;
use crate::error::{PipelineError, Result};
use std::collections::{HashMap, HashSet};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<Value>>,
}

impl Table {
    /// Build from a header and rows; every row must match the header width.
    pub fn from_rows(columns: Vec<String>, rows: Vec<Vec<Value>>) -> Result<Self> {
        if let Some((i, row)) = rows.iter().enumerate().find(|(_, r)| r.len() != columns.len()) {
            return Err(PipelineError::data(
                "<row>",
                format!("row {} has {} cells, header has {}", i, row.len(), columns.len()),
            ));
        }
        Ok(Self { columns, rows })
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<Value>] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Index of a raw column the caller cannot do without.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name)
            .ok_or_else(|| PipelineError::data(name, "required column is absent"))
    }

    pub fn column(&self, name: &str) -> Option<Vec<&Value>> {
        let idx = self.column_index(name)?;
        Some(self.rows.iter().map(|r| &r[idx]).collect())
    }

    pub fn get(&self, row: usize, name: &str) -> Option<&Value> {
        let idx = self.column_index(name)?;
        self.rows.get(row).map(|r| &r[idx])
    }

    /// Set a column, replacing it in place if the name already exists.
    pub fn set_column(&mut self, name: &str, values: Vec<Value>) -> Result<()> {
        if values.len() != self.rows.len() {
            return Err(PipelineError::data(
                name,
                format!("{} values for {} rows", values.len(), self.rows.len()),
            ));
        }
        match self.column_index(name) {
            Some(idx) => {
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row[idx] = v;
                }
            }
            None => {
                self.columns.push(name.to_string());
                for (row, v) in self.rows.iter_mut().zip(values) {
                    row.push(v);
                }
            }
        }
        Ok(())
    }

    /// Project onto `names` in the given order. Returns the first absent name on failure.
    pub fn select<S: AsRef<str>>(&self, names: &[S]) -> std::result::Result<Table, String> {
        let mut idx = Vec::with_capacity(names.len());
        for n in names {
            match self.column_index(n.as_ref()) {
                Some(i) => idx.push(i),
                None => return Err(n.as_ref().to_string()),
            }
        }
        Ok(Table {
            columns: names.iter().map(|n| n.as_ref().to_string()).collect(),
            rows: self
                .rows
                .iter()
                .map(|r| idx.iter().map(|&i| r[i].clone()).collect())
                .collect(),
        })
    }

    pub fn drop_columns<S: AsRef<str>>(&self, names: &[S]) -> Table {
        let drop: HashSet<&str> = names.iter().map(|n| n.as_ref()).collect();
        let keep: Vec<String> = self
            .columns
            .iter()
            .filter(|c| !drop.contains(c.as_str()))
            .cloned()
            .collect();
        // every kept name exists, so select cannot fail
        self.select(&keep).unwrap_or_default()
    }

    /// Drop exact-duplicate rows, keeping the first occurrence. Returns the number removed.
    pub fn dedup_rows(&mut self) -> usize {
        let before = self.rows.len();
        let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(before);
        self.rows.retain(|row| seen.insert(row.iter().map(|v| format!("{:?}", v)).collect()));
        before - self.rows.len()
    }

    /// Column name to index, for stages that read many columns per row.
    pub fn index_map(&self) -> HashMap<&str, usize> {
        self.columns
            .iter()
            .enumerate()
            .map(|(i, c)| (c.as_str(), i))
            .collect()
    }
}
