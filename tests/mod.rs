mod google_calendar_mock;
mod smoke_tests;

// This file organizes the integration tests into a cohesive test suite.
// Each module tests a specific aspect of the application:
// - smoke_tests: Basic functionality tests to ensure nothing is broken
// - google_calendar_mock: Mocking the calendar CRUD surface for testing
// - intent_flow: Interpretation parsing and reply formatting for the pipeline
