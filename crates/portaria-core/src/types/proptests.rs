//! Property-based tests for status derivation, room lists, and search.
