//! Unit and behaviour tests for the `patchgate` facade.

mod plan_tests;
