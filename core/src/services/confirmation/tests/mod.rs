//! Unit tests for the confirmation service


mod guard_tests;
