// system-tests/src/lib.rs
// ============================================================================
// Module: System Tests Library
// Description: Shared configuration for Dapr interop system-test suites.
// Purpose: Provide common utilities for the system-test binaries.
// Dependencies: std
// ============================================================================

//! ## Overview
//! This crate hosts shared configuration used by the system-test binaries in
//! `system-tests/tests`. The suites themselves require a Docker daemon and
//! run only with `--features system-tests`.

// ============================================================================
// SECTION: Modules
// ============================================================================

pub mod config;

// ============================================================================
// SECTION: Tests
// ============================================================================
