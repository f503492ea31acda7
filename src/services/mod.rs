// ABOUTME: Business pipelines orchestrating prompts, the AI gateway, and storage
// ABOUTME: Re-exports the generation and modification entry points
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Atlas Coach

pub mod generation;
pub mod modification;

pub use generation::{generate_program, GenerateProgramRequest, PersonalInfo};
pub use modification::{modify_program, ModificationOutcome};
