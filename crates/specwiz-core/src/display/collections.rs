//! Collection wrapper types for displaying groups of domain objects.
//!
//! This module provides wrapper types that format collections of domain objects
//! with consistent structure and empty collection handling.

use std::{fmt, ops::Index};

use crate::models::{Item, ItemType, Job, StepView};

/// Newtype wrapper for displaying the wizard's steps in order.
///
/// # Examples
///
/// ```rust
/// use specwiz_core::{
///     display::StepViews,
///     models::{StepType, WizardDetail, WizardState, WizardSummary},
/// };
///
/// let state = WizardState::new(
///     WizardSummary { project_id: 7, steps: vec![] },
///     WizardDetail::empty(7),
/// );
/// let views = StepViews(state.views(None));
/// assert_eq!(views.len(), StepType::ALL.len());
/// assert!(views.to_string().contains("1. Objective"));
/// ```
pub struct StepViews(pub Vec<StepView>);

impl StepViews {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of steps in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the steps.
    pub fn iter(&self) -> std::slice::Iter<'_, StepView> {
        self.0.iter()
    }
}

impl Index<usize> for StepViews {
    type Output = StepView;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

impl<'a> IntoIterator for &'a StepViews {
    type Item = &'a StepView;
    type IntoIter = std::slice::Iter<'a, StepView>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for StepViews {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No wizard steps loaded.");
        }
        for view in &self.0 {
            write!(f, "{view}")?;
        }
        Ok(())
    }
}

/// The items of one type, headed by the type's label and selection count.
pub struct Items {
    pub item_type: ItemType,
    pub items: Vec<Item>,
}

impl Items {
    pub fn new(item_type: ItemType, items: Vec<Item>) -> Self {
        Self { item_type, items }
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Get the number of items in the collection.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Get an iterator over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, Item> {
        self.items.iter()
    }
}

impl Index<usize> for Items {
    type Output = Item;

    fn index(&self, index: usize) -> &Self::Output {
        &self.items[index]
    }
}

impl<'a> IntoIterator for &'a Items {
    type Item = &'a Item;
    type IntoIter = std::slice::Iter<'a, Item>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}

impl fmt::Display for Items {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let selected = self.items.iter().filter(|item| item.is_selected).count();
        writeln!(
            f,
            "### {} ({selected}/{} selected)",
            self.item_type.label(),
            self.items.len()
        )?;
        writeln!(f)?;

        if self.items.is_empty() {
            return writeln!(f, "No items found.");
        }
        for item in &self.items {
            write!(f, "{item}")?;
        }
        Ok(())
    }
}

/// Newtype wrapper for displaying a project's jobs.
pub struct Jobs(pub Vec<Job>);

impl Jobs {
    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of jobs in the collection.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get an iterator over the jobs.
    pub fn iter(&self) -> std::slice::Iter<'_, Job> {
        self.0.iter()
    }
}

impl<'a> IntoIterator for &'a Jobs {
    type Item = &'a Job;
    type IntoIter = std::slice::Iter<'a, Job>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}

impl fmt::Display for Jobs {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.0.is_empty() {
            return writeln!(f, "No jobs found.");
        }
        for job in &self.0 {
            write!(f, "{job}")?;
        }
        Ok(())
    }
}
