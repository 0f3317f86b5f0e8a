use clap::{Arg, Command};

pub const ARG_ARGON2_MEMORY_KIB: &str = "argon2-memory-kib";
pub const ARG_ARGON2_ITERATIONS: &str = "argon2-iterations";
pub const ARG_ARGON2_PARALLELISM: &str = "argon2-parallelism";
pub const ARG_ARGON2_SALT_LENGTH: &str = "argon2-salt-length";
pub const ARG_ARGON2_KEY_LENGTH: &str = "argon2-key-length";

/// Argon2id cost knobs. Defaults match `CostParameters::default()`.
#[must_use]
pub fn with_args(command: Command) -> Command {
    command
        .arg(
            Arg::new(ARG_ARGON2_MEMORY_KIB)
                .long(ARG_ARGON2_MEMORY_KIB)
                .help("Argon2id memory cost in KiB")
                .env("REGISTRAR_ARGON2_MEMORY_KIB")
                .default_value("65536")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_ARGON2_ITERATIONS)
                .long(ARG_ARGON2_ITERATIONS)
                .help("Argon2id time cost (passes over memory)")
                .env("REGISTRAR_ARGON2_ITERATIONS")
                .default_value("3")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_ARGON2_PARALLELISM)
                .long(ARG_ARGON2_PARALLELISM)
                .help("Argon2id lanes")
                .env("REGISTRAR_ARGON2_PARALLELISM")
                .default_value("2")
                .value_parser(clap::value_parser!(u8)),
        )
        .arg(
            Arg::new(ARG_ARGON2_SALT_LENGTH)
                .long(ARG_ARGON2_SALT_LENGTH)
                .help("Salt length in bytes")
                .env("REGISTRAR_ARGON2_SALT_LENGTH")
                .default_value("16")
                .value_parser(clap::value_parser!(u32)),
        )
        .arg(
            Arg::new(ARG_ARGON2_KEY_LENGTH)
                .long(ARG_ARGON2_KEY_LENGTH)
                .help("Derived key length in bytes")
                .env("REGISTRAR_ARGON2_KEY_LENGTH")
                .default_value("32")
                .value_parser(clap::value_parser!(u32)),
        )
}
