// SPDX-FileCopyrightText: 2026 Sephyi <me@sephy.io>
//
// SPDX-License-Identifier: GPL-3.0-only

mod change;
mod commit;
mod options;

pub use change::*;
pub use commit::*;
pub use options::*;
