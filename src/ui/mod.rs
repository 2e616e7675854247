// SPDX-License-Identifier: MPL-2.0
//! User interface components, following the Elm-style "state down,
//! messages up" pattern.
//!
//! - [`compare`] - The comparison widget
//! - [`styles`] - Centralized styling (buttons, containers, overlays, slider)
//! - [`design_tokens`] - Design system constants (colors, spacing, sizing)
//! - [`theming`] - Light/Dark/System theme mode management
//! - [`icons`] - Embedded SVG icons

pub mod compare;
pub mod design_tokens;
pub mod icons;
pub mod styles;
pub mod theming;
