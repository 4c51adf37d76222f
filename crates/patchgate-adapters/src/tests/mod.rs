//! Cross-module tests for `patchgate_adapters`.
