// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod dropdown;
pub mod editor;
pub mod forms;
pub mod ids;
pub mod instructions;
pub mod kinds;
pub mod model;
pub mod state;

pub use dropdown::*;
pub use editor::*;
pub use forms::*;
pub use ids::*;
pub use instructions::*;
pub use kinds::*;
pub use model::*;
pub use state::*;
