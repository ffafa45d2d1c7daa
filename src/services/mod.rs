// Service exports
pub mod appwrite;
pub mod directory;
pub mod generator;
pub mod openai;
pub mod seed;

pub use appwrite::AppwriteDirectory;
pub use directory::{DirectoryError, OrganisationDirectory};
pub use generator::{GenerationError, GenerationOptions, TextGenerator};
pub use openai::OpenAiClient;
pub use seed::SeedDirectory;
