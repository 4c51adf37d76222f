//! Unit and behaviour tests for `patchgate_validator`.

mod score_tests;
