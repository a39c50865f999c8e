//! Infrastructure implementations for Unimart.
//!
//! Holds the HTTP clients behind the core's ports: the Gemini client
//! implementing both `SafetyClassifier` and `DescriptionGenerator`.

pub mod gemini;
