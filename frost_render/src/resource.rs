// Copyright 2026 the Frost Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Handles for target-owned layers.

use slotmap::new_key_type;

new_key_type! {
    /// An opaque handle to a layer owned by a draw target.
    ///
    /// Slots are reused after release, but a handle to a released layer never
    /// resolves to the layer that took its slot.
    pub struct LayerKey;
}
