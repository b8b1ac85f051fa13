use apitest_core::TestCase;
use serde_json::Value;
use std::time::Duration;

use super::assertions::Assertion;

/// All possible actions in a test scenario
#[derive(Debug)]
pub enum ScenarioStep {
    // Suite registration
    RegisterSuite {
        case: TestCase,
    },
    RegisterFailingProvider {
        message: String,
    },

    // Run configuration
    DefaultTimeout {
        limit: Duration,
    },

    // Variable cache seeding (orchestrating thread's partition)
    SetVar {
        key: String,
        value: Value,
    },
    ClearVars,

    // Execution
    Run,

    // Assertions (can be interspersed)
    Assert {
        assertion: Assertion,
    },
}
