pub mod classic_generator;
pub mod story_backend;
pub mod story_payload;
pub mod story_service;

pub use classic_generator::{ClassicGenerator, MathFact};
pub use story_backend::{OpenAiStoryBackend, StoryBackend, StoryRequest};
pub use story_payload::StoryPayload;
pub use story_service::{StoryOutcome, StoryService};
