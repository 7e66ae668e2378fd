// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

mod cleanup;
mod help;
mod rollback;
mod status;
mod versions;
