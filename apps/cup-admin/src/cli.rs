//! Command-line parsing.

use cup_core::CustomerMembership;
use std::path::PathBuf;

use crate::error::{AdminError, AdminResult};

pub const USAGE: &str = "\
Cup Order Admin

Usage: cup-admin [--config <PATH>] <COMMAND> [OPTIONS]

Commands:
  order    --customer <ID> [--membership basic|premium] --cups <N>
           Place an order and print the outcome
  quote    [--membership basic|premium] --cups <N>
           Print the discount an order would get
  stock    Print the number of cups in stock
  restock  --count <N>
           Add cups to stock
  init-config
           Write the effective configuration to the config file

Options:
  -c, --config <PATH>  Config file (default: platform config dir)
  -h, --help           Show this help message";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Order {
        customer_id: i64,
        membership: CustomerMembership,
        cups: i64,
    },
    Quote {
        membership: CustomerMembership,
        cups: i64,
    },
    Stock,
    Restock {
        count: u32,
    },
    InitConfig,
    Help,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Invocation {
    pub config_path: Option<PathBuf>,
    pub command: Command,
}

#[derive(Debug, Default)]
struct Flags {
    customer: Option<i64>,
    membership: Option<CustomerMembership>,
    cups: Option<i64>,
    count: Option<u32>,
}

/// Parses arguments, excluding the program name.
pub fn parse<I, S>(args: I) -> AdminResult<Invocation>
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    let args: Vec<String> = args.into_iter().map(Into::into).collect();

    let mut config_path = None;
    let mut command_name: Option<String> = None;
    let mut flags = Flags::default();

    let mut i = 0;
    while i < args.len() {
        let arg = args[i].as_str();
        match arg {
            "--help" | "-h" => {
                return Ok(Invocation {
                    config_path,
                    command: Command::Help,
                })
            }
            "--config" | "-c" => {
                config_path = Some(PathBuf::from(value_of(&args, i)?));
                i += 1;
            }
            "--customer" => {
                flags.customer = Some(number_of(&args, i)?);
                i += 1;
            }
            "--membership" => {
                let membership = value_of(&args, i)?
                    .parse()
                    .map_err(|e: cup_core::CoreError| AdminError::usage(e.to_string()))?;
                flags.membership = Some(membership);
                i += 1;
            }
            "--cups" => {
                flags.cups = Some(number_of(&args, i)?);
                i += 1;
            }
            "--count" => {
                flags.count = Some(number_of(&args, i)?);
                i += 1;
            }
            flag if flag.starts_with("--") => {
                return Err(AdminError::usage(format!("Unknown option '{flag}'")));
            }
            name => {
                if let Some(existing) = &command_name {
                    return Err(AdminError::usage(format!(
                        "Unexpected argument '{name}' after command '{existing}'"
                    )));
                }
                command_name = Some(name.to_string());
            }
        }
        i += 1;
    }

    let command = match command_name.as_deref() {
        None => Command::Help,
        Some("order") => Command::Order {
            customer_id: flags.customer.ok_or_else(|| missing("order", "--customer"))?,
            membership: flags.membership.unwrap_or_default(),
            cups: flags.cups.ok_or_else(|| missing("order", "--cups"))?,
        },
        Some("quote") => Command::Quote {
            membership: flags.membership.unwrap_or_default(),
            cups: flags.cups.ok_or_else(|| missing("quote", "--cups"))?,
        },
        Some("stock") => Command::Stock,
        Some("restock") => Command::Restock {
            count: flags.count.ok_or_else(|| missing("restock", "--count"))?,
        },
        Some("init-config") => Command::InitConfig,
        Some(other) => return Err(AdminError::usage(format!("Unknown command '{other}'"))),
    };

    Ok(Invocation {
        config_path,
        command,
    })
}

fn value_of(args: &[String], flag_index: usize) -> AdminResult<&str> {
    args.get(flag_index + 1)
        .map(String::as_str)
        .ok_or_else(|| AdminError::usage(format!("{} requires a value", args[flag_index])))
}

fn number_of<T: std::str::FromStr>(args: &[String], flag_index: usize) -> AdminResult<T> {
    let raw = value_of(args, flag_index)?;
    raw.parse().map_err(|_| {
        AdminError::usage(format!(
            "{} expects a number, got '{raw}'",
            args[flag_index]
        ))
    })
}

fn missing(command: &str, flag: &str) -> AdminError {
    AdminError::usage(format!("'{command}' requires {flag}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_command() {
        let invocation = parse([
            "order",
            "--customer",
            "42",
            "--membership",
            "Premium",
            "--cups",
            "5",
        ])
        .unwrap();

        assert_eq!(invocation.config_path, None);
        assert_eq!(
            invocation.command,
            Command::Order {
                customer_id: 42,
                membership: CustomerMembership::Premium,
                cups: 5,
            }
        );
    }

    #[test]
    fn test_membership_defaults_to_basic() {
        let invocation = parse(["quote", "--cups", "3"]).unwrap();
        assert_eq!(
            invocation.command,
            Command::Quote {
                membership: CustomerMembership::Basic,
                cups: 3,
            }
        );
    }

    #[test]
    fn test_negative_cups_reach_validation() {
        // Range checks belong to the service, not the parser
        let invocation = parse(["quote", "--cups", "-2"]).unwrap();
        assert!(matches!(invocation.command, Command::Quote { cups: -2, .. }));
    }

    #[test]
    fn test_config_flag_and_simple_commands() {
        let invocation = parse(["--config", "/etc/cups.toml", "stock"]).unwrap();
        assert_eq!(invocation.config_path, Some(PathBuf::from("/etc/cups.toml")));
        assert_eq!(invocation.command, Command::Stock);

        let invocation = parse(["restock", "--count", "12"]).unwrap();
        assert_eq!(invocation.command, Command::Restock { count: 12 });

        let invocation = parse(["init-config", "-c", "cups.toml"]).unwrap();
        assert_eq!(invocation.command, Command::InitConfig);
        assert_eq!(invocation.config_path, Some(PathBuf::from("cups.toml")));
    }

    #[test]
    fn test_help() {
        assert_eq!(parse(Vec::<String>::new()).unwrap().command, Command::Help);
        assert_eq!(parse(["order", "-h"]).unwrap().command, Command::Help);
    }

    #[test]
    fn test_usage_errors() {
        for args in [
            vec!["order", "--cups", "2"],
            vec!["quote"],
            vec!["restock", "--count", "-1"],
            vec!["stock", "--cups"],
            vec!["brew"],
            vec!["stock", "extra"],
            vec!["stock", "--verbose"],
        ] {
            let err = parse(args.clone()).unwrap_err();
            assert!(matches!(err, AdminError::Usage(_)), "{args:?} gave {err:?}");
        }
    }

    #[test]
    fn test_unknown_membership() {
        let err = parse(["quote", "--membership", "gold", "--cups", "1"]).unwrap_err();
        assert!(matches!(err, AdminError::Usage(_)));
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("gold"));
    }
}
