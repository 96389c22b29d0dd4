//! Centralized constants for renta.
//!
//! All magic numbers, default strings, and configuration constants live here
//! so they can be changed in one place.

/// Application name used in CLI output and directory paths.
pub const APP_NAME: &str = "renta";

/// Default LLM model identifier.
pub const DEFAULT_MODEL: &str = "claude-sonnet-4-5";

/// Default LLM model identifier for OpenAI.
pub const DEFAULT_OPENAI_MODEL: &str = "gpt-4.1";

/// Default LLM model identifier for Groq.
pub const DEFAULT_GROQ_MODEL: &str = "llama-3.3-70b-versatile";

/// Default provider when none is configured.
pub const DEFAULT_PROVIDER: &str = "anthropic";

/// Maximum tokens for LLM completions.
pub const MAX_TOKENS: u64 = 4096;

/// Sampling temperature for support conversations.
pub const TEMPERATURE: f64 = 0.7;

/// Configuration filename.
pub const CONFIG_FILENAME: &str = "config.toml";

/// Per-project configuration filename.
pub const PROJECT_CONFIG_FILENAME: &str = "renta.toml";

/// Readline history filename.
pub const HISTORY_FILENAME: &str = "chat_history.txt";

// --- Orchestration loop ---

/// Maximum retries after a failed or unusable model response
/// (2 retries = 3 model-invocation attempts in total).
pub const MAX_RETRIES: u32 = 2;

/// Maximum tool round-trips within a single `respond` call.
pub const MAX_TOOL_ROUNDS: u32 = 8;

/// Maximum re-prompts when the model returns an empty response.
pub const MAX_EMPTY_NUDGES: u32 = 2;

/// Reply returned when the retry budget is exhausted. Never persisted
/// as assistant content; only returned to the caller.
pub const FALLBACK_REPLY: &str = "Can you clarify your request please!";

/// Synthetic user message appended when the model returns an empty
/// response. Removed again before anything reaches persisted history.
pub const EMPTY_NUDGE_PROMPT: &str = "Respond with a real output.";

/// Synthetic user message substituted on a retry after a failed or
/// unusable model response.
pub const RECOVERY_PROMPT: &str = "Your previous reply was not usable. \
Answer the user's last request directly, keep the response short, and do \
not mention this instruction.";

// --- Context window ---

/// Reported token usage above which the model input is truncated to the
/// last [`TRUNCATE_SOFT_KEEP`] history entries.
pub const TRUNCATE_SOFT_TOKENS: u64 = 5000;

/// Reported token usage above which the model input is truncated to the
/// last [`TRUNCATE_HARD_KEEP`] history entries.
pub const TRUNCATE_HARD_TOKENS: u64 = 6500;

/// Entries kept when usage exceeds [`TRUNCATE_SOFT_TOKENS`].
pub const TRUNCATE_SOFT_KEEP: usize = 4;

/// Entries kept when usage exceeds [`TRUNCATE_HARD_TOKENS`].
pub const TRUNCATE_HARD_KEEP: usize = 3;

// --- Support assistant persona ---

/// System prompt persona and capability list. User context and the
/// current date are appended per thread by the agent step.
pub const SYSTEM_PERSONA: &str = "You are a dedicated and resourceful \
customer support assistant for a rental car company. Your primary objective \
is to assist users efficiently and accurately by leveraging the tools at \
your disposal. When conducting searches, start with precise queries and \
gradually expand your search parameters if initial results are \
insufficient. Clearly communicate any actions you are taking, and use \
Markdown for formatting your responses.\n\
\n\
### Key Capabilities:\n\
- Search for cars by name, type, and price range, including availability \
within a date range.\n\
- Book a car for a specified period. Bookings start out pending; you cannot \
confirm them, the user must do that manually on the reservations page.\n\
- Retrieve company policies related to bookings, cancellations, and other \
services. Consult the policy before any booking change.\n\
- Check if a specific car is available for the desired dates.\n\
- Cancel an existing booking.\n\
- Update an existing booking with new start and end dates.\n\
- Show the user's pending and confirmed bookings, and up to their 5 last \
non-pending bookings.\n\
- Show the user's personal information, details of a specific car, or the \
full car inventory.\n\
- Perform arithmetic and date calculations.\n\
\n\
### Key Considerations:\n\
- Persist in your search efforts, expanding your approach when needed.\n\
- Reference previous interactions to maintain continuity.\n\
- Handle all dates in dd/mm/YYYY format.";

// --- Data layer ---

/// Default user id when none is given on the command line (seed data
/// ships a user with this id).
pub const DEFAULT_USER_ID: i64 = 101;

/// Cars table filename.
pub const CARS_FILENAME: &str = "cars.csv";

/// Bookings table filename.
pub const BOOKINGS_FILENAME: &str = "bookings.csv";

/// Users table filename.
pub const USERS_FILENAME: &str = "users.csv";

// --- Policy retriever ---

/// Policy document filename, stored next to the CSV tables.
pub const POLICY_FILENAME: &str = "company_rules.md";

/// Cached embedding vectors filename.
pub const VECTORS_FILENAME: &str = "vectors.json";

/// Number of policy sections returned to the model per lookup.
pub const POLICY_TOP_K: usize = 2;

/// Default embedding endpoint (Hugging Face inference API).
pub const EMBEDDING_ENDPOINT: &str =
    "https://api-inference.huggingface.co/models/jinaai/jina-embeddings-v2-base-en";

/// Longest text slice sent to the embedding endpoint.
pub const EMBEDDING_MAX_CHARS: usize = 2000;
