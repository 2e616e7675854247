// SPDX-License-Identifier: MPL-2.0
//! Internationalization (i18n) support using the Fluent localization system.
//!
//! Translation files are embedded at build time from `assets/i18n/`. The
//! locale is chosen from the CLI, then the config file, then the OS, and
//! falls back to `en-US`.

pub mod fluent;
