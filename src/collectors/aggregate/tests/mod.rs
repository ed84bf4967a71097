//! Test module organization for attribute aggregation
//!
//! Unit tests for the collector and its write-once result buffer.
