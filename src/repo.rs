//! Repository view over the version-control collaborator.
//!
//! The engine never touches a process or the network itself. Everything it
//! needs comes through [`VcsBackend`], which the embedding tool implements
//! by shelling out to the version-control binary and parsing its output.
//!
//! [`RepoView`] wraps a backend with compute-once caches scoped to one
//! report generation: branch names, commit epochs, and the parsed property
//! dump are each fetched at most once per view. The caches are never
//! invalidated; construct a fresh view for a fresh look at the repository.

use crate::commit_time::CommitTime;
use crate::error::{ReportError, Result};
use crate::properties::{is_reserved, parse_config_dump, property_union, PropertyMap};
use crate::report::{BranchReport, ReportOptions};
use chrono::{DateTime, Utc};
use once_cell::unsync::OnceCell;
use std::collections::{BTreeMap, HashMap};
use tracing::debug;

/// External collaborator interface to the version-control store.
///
/// Read methods hand the engine already-clean values; mutation methods
/// persist a single property change. Implementations are expected to be
/// blocking and are invoked at most once per distinct query per
/// [`RepoView`].
pub trait VcsBackend {
    /// All local branch names, unordered.
    fn branch_names(&self) -> Result<Vec<String>>;

    /// Name of the currently checked-out branch.
    fn current_branch_name(&self) -> Result<String>;

    /// Last-commit epoch seconds for each of the given branches. Branches
    /// without a resolvable commit are simply absent from the result.
    fn commit_epochs(&self, branches: &[String]) -> Result<HashMap<String, i64>>;

    /// The raw configuration dump, one `key=value` line per entry.
    fn config_dump(&self) -> Result<Vec<String>>;

    /// A single property value, if set.
    fn property(&self, branch: &str, key: &str) -> Result<Option<String>>;

    /// Persist a property value.
    fn set_property(&mut self, branch: &str, key: &str, value: &str) -> Result<()>;

    /// Remove a property.
    fn unset_property(&mut self, branch: &str, key: &str) -> Result<()>;
}

/// A memoizing view of one repository, scoped to one report generation.
pub struct RepoView<B> {
    backend: B,
    branch_names: OnceCell<Vec<String>>,
    current_branch: OnceCell<String>,
    commit_epochs: OnceCell<HashMap<String, i64>>,
    properties: OnceCell<BTreeMap<String, PropertyMap>>,
}

impl<B: VcsBackend> RepoView<B> {
    pub fn new(backend: B) -> Self {
        Self {
            backend,
            branch_names: OnceCell::new(),
            current_branch: OnceCell::new(),
            commit_epochs: OnceCell::new(),
            properties: OnceCell::new(),
        }
    }

    /// The wrapped backend.
    pub fn backend(&self) -> &B {
        &self.backend
    }

    /// Branch names, sorted, fetched from the backend on first access.
    pub fn branch_names(&self) -> Result<&[String]> {
        self.branch_names
            .get_or_try_init(|| {
                let mut names = self.backend.branch_names()?;
                names.sort();
                debug!(count = names.len(), "fetched branch names");
                Ok(names)
            })
            .map(Vec::as_slice)
    }

    /// Name of the currently checked-out branch, fetched on first access.
    pub fn current_branch_name(&self) -> Result<&str> {
        self.current_branch
            .get_or_try_init(|| {
                let name = self.backend.current_branch_name()?;
                debug!(%name, "fetched current branch");
                Ok(name)
            })
            .map(String::as_str)
    }

    /// Last-commit epochs for all branches, fetched on first access.
    pub fn commit_epochs(&self) -> Result<&HashMap<String, i64>> {
        self.commit_epochs.get_or_try_init(|| {
            let names = self.branch_names()?.to_vec();
            let epochs = self.backend.commit_epochs(&names)?;
            debug!(count = epochs.len(), "fetched commit epochs");
            Ok(epochs)
        })
    }

    /// Per-branch properties parsed from the configuration dump, fetched
    /// on first access.
    pub fn properties(&self) -> Result<&BTreeMap<String, PropertyMap>> {
        self.properties.get_or_try_init(|| {
            let dump = self.backend.config_dump()?;
            let parsed = parse_config_dump(dump.iter().map(String::as_str));
            debug!(branches = parsed.len(), "parsed property dump");
            Ok(parsed)
        })
    }

    /// The discoverable column set: union of custom property keys across
    /// all branches, sorted, reserved keys excluded.
    pub fn property_columns(&self) -> Result<Vec<String>> {
        Ok(property_union(self.properties()?))
    }

    /// The commit time for one branch, labelled against `now`. None when
    /// the branch has no resolvable commit.
    pub fn commit_time(&self, branch: &str, now: DateTime<Utc>) -> Result<Option<CommitTime>> {
        match self.commit_epochs()?.get(branch) {
            Some(&epoch) => Ok(Some(CommitTime::from_epoch(epoch, now)?)),
            None => Ok(None),
        }
    }

    /// A single property value straight from the backend.
    pub fn property(&self, branch: &str, key: &str) -> Result<Option<String>> {
        if branch.is_empty() {
            return Err(ReportError::EmptyBranchName);
        }
        self.backend.property(branch, key)
    }

    /// Set a property, with the reservation guard applied before the
    /// backend is invoked. An empty or whitespace-only value unsets the
    /// property instead of storing an empty string. Returns a user-facing
    /// confirmation message.
    pub fn set_property(&mut self, branch: &str, key: &str, value: &str) -> Result<String> {
        if branch.is_empty() {
            return Err(ReportError::EmptyBranchName);
        }
        if is_reserved(key) {
            return Err(ReportError::ReservedProperty(key.to_string()));
        }

        let value = value.trim();
        if value.is_empty() {
            self.backend.unset_property(branch, key)?;
            Ok(format!("Removed property \"{key}\" for branch \"{branch}\""))
        } else {
            self.backend.set_property(branch, key, value)?;
            Ok(format!(
                "Saved property \"{key}\" as \"{value}\" for branch \"{branch}\""
            ))
        }
    }

    /// Remove a property outright. Reserved keys are refused the same way
    /// as on set.
    pub fn unset_property(&mut self, branch: &str, key: &str) -> Result<String> {
        if branch.is_empty() {
            return Err(ReportError::EmptyBranchName);
        }
        if is_reserved(key) {
            return Err(ReportError::ReservedProperty(key.to_string()));
        }

        self.backend.unset_property(branch, key)?;
        Ok(format!("Removed property \"{key}\" for branch \"{branch}\""))
    }

    /// Build the branch report from the cached inputs. `now` is read once
    /// by the caller and passed in; every label in the report is relative
    /// to it.
    pub fn report(&self, now: DateTime<Utc>, options: ReportOptions) -> Result<BranchReport> {
        let names = self.branch_names()?.to_vec();
        BranchReport::build(&names, self.commit_epochs()?, self.properties()?, now, options)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    /// Backend that counts calls, so memoization is observable.
    #[derive(Default)]
    struct CountingBackend {
        branch_calls: Cell<usize>,
        current_calls: Cell<usize>,
        epoch_calls: Cell<usize>,
        dump_calls: Cell<usize>,
        writes: Cell<usize>,
    }

    impl VcsBackend for CountingBackend {
        fn branch_names(&self) -> Result<Vec<String>> {
            self.branch_calls.set(self.branch_calls.get() + 1);
            Ok(vec!["beta".to_string(), "alpha".to_string()])
        }

        fn current_branch_name(&self) -> Result<String> {
            self.current_calls.set(self.current_calls.get() + 1);
            Ok("alpha".to_string())
        }

        fn commit_epochs(&self, branches: &[String]) -> Result<HashMap<String, i64>> {
            self.epoch_calls.set(self.epoch_calls.get() + 1);
            Ok(branches.iter().map(|b| (b.clone(), 1_348_859_410)).collect())
        }

        fn config_dump(&self) -> Result<Vec<String>> {
            self.dump_calls.set(self.dump_calls.get() + 1);
            Ok(vec!["branch.alpha.ticket=T-1".to_string()])
        }

        fn property(&self, _branch: &str, _key: &str) -> Result<Option<String>> {
            Ok(None)
        }

        fn set_property(&mut self, _branch: &str, _key: &str, _value: &str) -> Result<()> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }

        fn unset_property(&mut self, _branch: &str, _key: &str) -> Result<()> {
            self.writes.set(self.writes.get() + 1);
            Ok(())
        }
    }

    #[test]
    fn test_branch_names_sorted_and_memoized() {
        let view = RepoView::new(CountingBackend::default());

        assert_eq!(view.branch_names().unwrap(), ["alpha", "beta"]);
        assert_eq!(view.branch_names().unwrap(), ["alpha", "beta"]);
        assert_eq!(view.backend.branch_calls.get(), 1);
    }

    #[test]
    fn test_current_branch_memoized() {
        let view = RepoView::new(CountingBackend::default());

        assert_eq!(view.current_branch_name().unwrap(), "alpha");
        assert_eq!(view.current_branch_name().unwrap(), "alpha");
        assert_eq!(view.backend.current_calls.get(), 1);
    }

    #[test]
    fn test_epochs_and_properties_memoized() {
        let view = RepoView::new(CountingBackend::default());

        view.commit_epochs().unwrap();
        view.commit_epochs().unwrap();
        view.properties().unwrap();
        view.property_columns().unwrap();

        assert_eq!(view.backend.epoch_calls.get(), 1);
        assert_eq!(view.backend.dump_calls.get(), 1);
    }

    #[test]
    fn test_reserved_property_rejected_before_backend() {
        let mut view = RepoView::new(CountingBackend::default());

        let result = view.set_property("alpha", "merge", "NOOO");
        assert!(matches!(result, Err(ReportError::ReservedProperty(_))));
        assert_eq!(view.backend.writes.get(), 0);
    }

    #[test]
    fn test_empty_value_unsets() {
        let mut view = RepoView::new(CountingBackend::default());

        let message = view.set_property("alpha", "ticket", "   ").unwrap();
        assert_eq!(message, "Removed property \"ticket\" for branch \"alpha\"");
        assert_eq!(view.backend.writes.get(), 1);
    }

    #[test]
    fn test_set_property_message() {
        let mut view = RepoView::new(CountingBackend::default());

        let message = view.set_property("alpha", "ticket", "T-9").unwrap();
        assert_eq!(message, "Saved property \"ticket\" as \"T-9\" for branch \"alpha\"");
    }
}
