//! Integration test entry — wires the shared mocks into each suite.

// Provides the critical-section implementation embassy-sync channels need
// under the host test runner.
use critical_section as _;


mod concurrency_tests;
mod dispatch_tests;
mod registry_tests;
mod web_tests;
