#![deny(missing_docs)]
//! Warden core library.
//!
//! Write one assert function per guard and get five call forms from it:
//! `assert`, `check`, `assert_wrap`, `check_wrap` and the polling
//! `wait_until`. Guard groups bundle assert functions with per-form
//! overrides, and [`Guards`] merges every group into flat namespaces.

pub mod derive;
pub mod error;
pub mod form;
pub mod fs;
pub mod group;
pub mod guard;
/// Built-in guard groups over JSON candidates.
pub mod guards;
pub mod namespace;
pub mod probe;
pub mod report;
pub mod wait_until;

pub use derive::{create_assert_wrap, create_check, create_check_wrap};
pub use error::{AssertionError, BoxError, Result, WaitUntilTimeout, WardenError};
pub use form::GuardForm;
pub use fs::{FileSystem, StdFileSystem};
pub use group::{
    AssertWrapFn, CheckFn, CheckWrapFn, GuardGroup, Override, Overrides, auto_guard,
    create_assert_wrap_group, create_check_group, create_check_wrap_group,
    create_wait_until_group,
};
pub use guard::{AssertFn, assert_fn, ensure};
pub use guards::{Candidate, build_guards, builtin_groups, guards};
pub use namespace::{Guards, Namespace};
pub use probe::{FileProbe, ProbeFormat, parse_candidate};
pub use report::{
    CatalogEntry, build_catalog, filter_catalog, render_catalog_markdown, render_catalog_text,
    render_json,
};
pub use wait_until::{
    Callback, DEFAULT_INTERVAL, DEFAULT_TIMEOUT, DurationSpec, WaitArg, WaitUntilCall,
    WaitUntilFn, WaitUntilOptions, create_wait_until, parse_wait_until_args, poll_until,
};
