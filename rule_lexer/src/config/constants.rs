pub mod compile_time {
    pub mod lexical {
        /// Maximum number of characters of unconsumed input quoted in a parse error
        /// RESOURCE: keeps error messages bounded for very long expressions
        pub const MAX_ERROR_SNIPPET_LENGTH: usize = 40;

        /// Input bytes per token assumed when reserving the output list
        /// PERFORMANCE: avoids repeated reallocation on long expressions
        pub const INPUT_BYTES_PER_TOKEN_HINT: usize = 2;
    }

    pub mod logging {
        /// Maximum events retained by an in-memory logger
        /// RESOURCE: bounds memory use of test and embedding loggers
        pub const LOG_BUFFER_SIZE: usize = 10_000;

        /// Maximum length of a single log message; longer messages are truncated
        pub const MAX_LOG_MESSAGE_LENGTH: usize = 4_096;
    }
}
