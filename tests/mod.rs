mod gateway_mock;
mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - scheduling_tests: Time normalization and event request building
// - gateway_mock: Mocking the calendar provider for testing
