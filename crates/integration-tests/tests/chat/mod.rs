mod error_handling;
mod groq;
