//! Replacement rules between descriptors
//!
//! A candidate may replace an incumbent only when it moves the same library
//! forward within the same major version. Pre-release and branch tags never
//! take part in the decision.

use std::cmp::Ordering;

use tracing::debug;

use crate::domain::descriptor::VersionDescriptor;

impl VersionDescriptor {
    /// True if `self` can safely be substituted for `incumbent` everywhere
    /// `incumbent` is referenced
    ///
    /// Rules, first match decides:
    /// 1. different library name: no
    /// 2. different major version: no
    /// 3. incumbent has the greater `minor.patch`: no
    /// 4. equal `minor.patch`: only a later dev build, or a release over a
    ///    dev build
    /// 5. otherwise: yes
    ///
    /// `minor.patch` is compared as a real number, so `1.0.10` orders below
    /// `1.0.9`.
    pub fn can_replace(&self, incumbent: &VersionDescriptor) -> bool {
        if incumbent.library_name() != self.library_name() {
            debug!(
                "not replaceable: {} != {} ({})",
                incumbent.library_name(),
                self.library_name(),
                incumbent.filename()
            );
            return false;
        }

        if incumbent.major_version() != self.major_version() {
            debug!(
                "not replaceable: major {} != {} ({})",
                self.major_version(),
                incumbent.major_version(),
                incumbent.filename()
            );
            return false;
        }

        match incumbent.minor_value().partial_cmp(&self.minor_value()) {
            Some(Ordering::Less) => true,
            Some(Ordering::Equal) => self.supersedes_same_version(incumbent),
            Some(Ordering::Greater) | None => {
                debug!(
                    "not replaceable: {} > {} ({})",
                    incumbent.minor_version(),
                    self.minor_version(),
                    incumbent.filename()
                );
                false
            }
        }
    }

    /// Tie-break for equal `minor.patch` on the dev ordinal
    fn supersedes_same_version(&self, incumbent: &VersionDescriptor) -> bool {
        let replaceable = match (self.dev(), incumbent.dev()) {
            (Some(candidate), Some(current)) => current < candidate,
            (None, Some(_)) => true,
            (Some(_), None) | (None, None) => false,
        };

        if !replaceable {
            debug!(
                "not replaceable: {} is not newer than {}",
                self.filename(),
                incumbent.filename()
            );
        }
        replaceable
    }
}
