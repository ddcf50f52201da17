use orchard_core::Pos;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    Help,
    Quit,
    New,
    End,
    Day,
    Board,
    Inventory,
    Status,
    /// Put the symbol in an inventory slot onto the grid.
    Place { slot: usize, cell: Option<Pos> },
    /// Drop a movable grid symbol on another cell.
    Drag { from: Pos, to: Pos },
}

fn parse_usize(token: Option<&str>, what: &str) -> Result<usize, String> {
    let token = token.ok_or_else(|| format!("missing {what}"))?;
    token
        .parse()
        .map_err(|_| format!("invalid {what}: {token}"))
}

fn parse_pos<'a>(tokens: &mut impl Iterator<Item = &'a str>) -> Result<Pos, String> {
    let row = parse_usize(tokens.next(), "row")?;
    let col = parse_usize(tokens.next(), "column")?;
    Ok(Pos::new(row, col))
}

pub fn parse_command(line: &str) -> Result<Command, String> {
    let mut tokens = line.split_whitespace();
    let Some(head) = tokens.next() else {
        return Err("empty command".to_string());
    };
    let command = match head.to_ascii_lowercase().as_str() {
        "help" | "h" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        "new" | "n" => Command::New,
        "end" | "e" => Command::End,
        "day" | "d" => Command::Day,
        "board" | "b" => Command::Board,
        "inv" | "inventory" | "i" => Command::Inventory,
        "status" | "s" => Command::Status,
        "place" | "p" => {
            let slot = parse_usize(tokens.next(), "slot")?;
            let cell = match tokens.next() {
                Some(row) => {
                    let row = parse_usize(Some(row), "row")?;
                    let col = parse_usize(tokens.next(), "column")?;
                    Some(Pos::new(row, col))
                }
                None => None,
            };
            Command::Place { slot, cell }
        }
        "drag" | "mv" => {
            let from = parse_pos(&mut tokens)?;
            let to = parse_pos(&mut tokens)?;
            Command::Drag { from, to }
        }
        other => return Err(format!("unknown command: {other}")),
    };
    if let Some(extra) = tokens.next() {
        return Err(format!("unexpected argument: {extra}"));
    }
    Ok(command)
}

pub const HELP: &[(&str, &str, &str)] = &[
    ("help|h|?", "show help", "mostrar ayuda"),
    ("new|n", "start a new game", "nueva partida"),
    (
        "place|p <slot> [row col]",
        "put an inventory symbol on the grid",
        "colocar un simbolo del inventario",
    ),
    (
        "drag|mv <row> <col> <row> <col>",
        "move a movable symbol",
        "mover un simbolo movible",
    ),
    (
        "end|e",
        "spend a coin and end the turn",
        "gastar una moneda y terminar el turno",
    ),
    (
        "day|d",
        "start the next day after clearing one",
        "empezar el siguiente dia",
    ),
    ("board|b", "show the grid", "mostrar la cuadricula"),
    ("inv|i", "show the inventory conveyor", "mostrar el inventario"),
    ("status|s", "one-line run status", "estado en una linea"),
    ("quit|q", "exit", "salir"),
];

#[cfg(test)]
mod tests {
    use super::*;

    macro_rules! parse_case {
        ($name:ident, $line:expr, $expected:expr) => {
            #[test]
            fn $name() {
                assert_eq!(parse_command($line), Ok($expected));
            }
        };
    }

    parse_case!(parse_end, "end", Command::End);
    parse_case!(parse_alias, " I ", Command::Inventory);
    parse_case!(
        parse_place_random,
        "place 3",
        Command::Place {
            slot: 3,
            cell: None
        }
    );
    parse_case!(
        parse_place_at,
        "p 0 2 5",
        Command::Place {
            slot: 0,
            cell: Some(Pos::new(2, 5))
        }
    );
    parse_case!(
        parse_drag,
        "drag 1 1 4 7",
        Command::Drag {
            from: Pos::new(1, 1),
            to: Pos::new(4, 7)
        }
    );

    #[test]
    fn rejects_bad_input() {
        assert!(parse_command("").is_err());
        assert!(parse_command("fly").is_err());
        assert!(parse_command("place").is_err());
        assert!(parse_command("place x").is_err());
        assert!(parse_command("place 1 2").is_err());
        assert!(parse_command("drag 1 1 4").is_err());
        assert!(parse_command("end now").is_err());
    }
}
