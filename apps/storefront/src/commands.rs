//! Turns a line of user input into a storefront command.

use shared::{domain::ProductId, protocol::StorefrontIntent};
use thiserror::Error;

pub const HELP: &str = "\
commands:
  list          show the product catalog
  add <id>      add a product to the cart
  inc <id>      raise a cart line's quantity by one
  dec <id>      lower a cart line's quantity by one
  remove <id>   remove a cart line
  cart          show the cart
  help          show this message
  quit          leave the storefront";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Intent(StorefrontIntent),
    ListProducts,
    ShowCart,
    Help,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CommandError {
    #[error("unknown command '{0}'; type 'help' for a list")]
    Unknown(String),
    #[error("'{0}' needs a product id")]
    MissingId(&'static str),
    #[error("'{0}' is not a product id")]
    InvalidId(String),
}

/// Parses one input line. Blank lines yield `Ok(None)`.
pub fn parse(line: &str) -> Result<Option<Command>, CommandError> {
    let mut words = line.split_whitespace();
    let Some(verb) = words.next() else {
        return Ok(None);
    };

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "products" => Command::ListProducts,
        "cart" => Command::ShowCart,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "add" => Command::Intent(StorefrontIntent::Add {
            product_id: product_id("add", words.next())?,
        }),
        "remove" | "rm" => Command::Intent(StorefrontIntent::Remove {
            line_id: product_id("remove", words.next())?,
        }),
        "inc" | "+" => Command::Intent(StorefrontIntent::IncrementQuantity {
            line_id: product_id("inc", words.next())?,
        }),
        "dec" | "-" => Command::Intent(StorefrontIntent::DecrementQuantity {
            line_id: product_id("dec", words.next())?,
        }),
        other => return Err(CommandError::Unknown(other.to_string())),
    };

    Ok(Some(command))
}

fn product_id(verb: &'static str, word: Option<&str>) -> Result<ProductId, CommandError> {
    let word = word.ok_or(CommandError::MissingId(verb))?;
    word.parse::<i64>()
        .map(ProductId)
        .map_err(|_| CommandError::InvalidId(word.to_string()))
}
