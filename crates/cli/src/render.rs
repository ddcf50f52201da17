use orchard_core::{
    Catalog, DestroyCause, Event, Locale, Location, MovementClass, Phase, Pos, RunState, Spot,
    SymbolInstance,
};
use std::fmt::Write as _;

pub fn text<'a>(locale: Locale, en: &'a str, es: &'a str) -> &'a str {
    match locale {
        Locale::En => en,
        Locale::Es => es,
    }
}

fn name_of<'a>(catalog: &'a Catalog, locale: Locale, key: &'a str) -> &'a str {
    catalog
        .get(key)
        .map(|def| def.display_name(locale))
        .unwrap_or(key)
}

fn format_location(locale: Locale, location: &Location) -> String {
    match location {
        Location::InGrid(pos) => format!("{} {pos}", text(locale, "cell", "celda")),
        Location::InInventory(slot) => format!("{} {slot}", text(locale, "slot", "ranura")),
        Location::Destroyed => text(locale, "gone", "destruido").to_string(),
    }
}

fn format_spot(locale: Locale, spot: &Spot) -> String {
    match spot {
        Spot::Cell(pos) => format_location(locale, &Location::InGrid(*pos)),
        Spot::Slot(slot) => format_location(locale, &Location::InInventory(*slot)),
    }
}

fn texture_name(movement: Option<MovementClass>) -> &'static str {
    match movement {
        None => "empty",
        Some(MovementClass::Movable) => "movable",
        Some(MovementClass::Fixed | MovementClass::Random) => "used",
    }
}

pub fn format_event(event: &Event, catalog: &Catalog, locale: Locale) -> String {
    match event {
        Event::SymbolCreated { id, key, value, at } => format!(
            "{} {} {id} = {value} @ {}",
            text(locale, "new", "nuevo"),
            name_of(catalog, locale, key),
            format_location(locale, at)
        ),
        Event::SymbolMoved {
            id,
            from,
            to,
            animation,
        } => format!(
            "{} {id}: {} -> {} [anim {}]",
            text(locale, "move", "mover"),
            format_location(locale, from),
            format_location(locale, to),
            animation.0
        ),
        Event::SymbolValueChanged { id, value } => {
            format!("{} {id} = {value}", text(locale, "value", "valor"))
        }
        Event::SymbolDestroyed {
            id,
            key,
            cause,
            animation,
        } => {
            let why = match cause {
                DestroyCause::Effect(source) => format!("{} {source}", text(locale, "by", "por")),
                DestroyCause::Chain(source) => {
                    format!("{} {source}", text(locale, "chain from", "cadena de"))
                }
                DestroyCause::Evicted => text(locale, "evicted", "expulsado").to_string(),
                DestroyCause::Reset => text(locale, "reset", "reinicio").to_string(),
            };
            format!(
                "{} {} {id} ({why}) [anim {}]",
                text(locale, "destroyed", "destruido"),
                name_of(catalog, locale, key),
                animation.0
            )
        }
        Event::CellTextureHint { spot, movement } => format!(
            "{} {}: {}",
            text(locale, "texture", "textura"),
            format_spot(locale, spot),
            texture_name(*movement)
        ),
        Event::ShieldTriggered {
            protector,
            protected,
        } => format!(
            "{} {protector} -> {protected}",
            text(locale, "shield", "escudo")
        ),
        Event::ValueReset { id } => format!("{} {id}", text(locale, "reset", "reinicio")),
        Event::GameStarted { day, goal, coins } => format!(
            "{}: {} {day} {} {goal} {} {coins}",
            text(locale, "game started", "partida iniciada"),
            text(locale, "day", "dia"),
            text(locale, "goal", "meta"),
            text(locale, "coins", "monedas")
        ),
        Event::TurnCharged {
            turn_value,
            score,
            coins_remaining,
        } => format!(
            "{}: +{turn_value} {} {score} {} {coins_remaining}",
            text(locale, "turn", "turno"),
            text(locale, "score", "puntos"),
            text(locale, "coins", "monedas")
        ),
        Event::TurnSettled {
            score,
            coins_remaining,
        } => format!(
            "{}: {} {score} {} {coins_remaining}",
            text(locale, "turn settled", "turno resuelto"),
            text(locale, "score", "puntos"),
            text(locale, "coins", "monedas")
        ),
        Event::DayCleared { day, score, goal } => format!(
            "{} {day} {}: {score}/{goal}",
            text(locale, "day", "dia"),
            text(locale, "cleared", "superado")
        ),
        Event::DayStarted { day, goal, coins } => format!(
            "{} {day}: {} {goal} {} {coins}",
            text(locale, "day", "dia"),
            text(locale, "goal", "meta"),
            text(locale, "coins", "monedas")
        ),
        Event::GameOver { day, score, goal } => format!(
            "{}: {} {day} {score}/{goal}",
            text(locale, "game over", "fin del juego"),
            text(locale, "day", "dia"),
        ),
    }
}

fn cell_label(symbol: Option<&SymbolInstance>) -> String {
    match symbol {
        Some(symbol) => {
            let short: String = symbol.key.chars().take(3).collect();
            let shield = if symbol.is_protected() { "*" } else { " " };
            format!("{short:<3}{:>3}{shield}", symbol.value)
        }
        None => format!("{:^7}", "."),
    }
}

pub fn render_board(run: &RunState) -> String {
    let mut out = String::new();
    let _ = write!(out, "   ");
    for col in 0..run.grid.cols() {
        let _ = write!(out, "{col:^7}");
    }
    out.push('\n');
    for row in 0..run.grid.rows() {
        let _ = write!(out, "{row:>2} ");
        for col in 0..run.grid.cols() {
            out.push_str(&cell_label(run.grid.symbol_at(Pos::new(row, col))));
        }
        out.push('\n');
    }
    out
}

pub fn render_inventory(run: &RunState, locale: Locale) -> String {
    let mut out = String::new();
    for (slot, symbol) in run.conveyor.slots().iter().enumerate() {
        let _ = write!(out, "[{slot}] ");
        match symbol {
            Some(symbol) => {
                let movement = run
                    .movement_of(symbol)
                    .map(|movement| format!("{movement:?}").to_lowercase())
                    .unwrap_or_default();
                let _ = writeln!(
                    out,
                    "{} {} = {} ({movement})",
                    name_of(&run.catalog, locale, &symbol.key),
                    symbol.id,
                    symbol.value
                );
            }
            None => {
                let _ = writeln!(out, "-");
            }
        }
    }
    out
}

pub fn render_status(run: &RunState, locale: Locale) -> String {
    let economy = &run.economy;
    let phase = match run.phase() {
        Phase::AwaitingStart => text(locale, "waiting to start", "esperando inicio"),
        Phase::Playing => text(locale, "playing", "jugando"),
        Phase::DayCleared => text(locale, "day cleared", "dia superado"),
        Phase::GameOver => text(locale, "game over", "fin del juego"),
    };
    format!(
        "{} {} | {} {}/{} | {} {}/{} | {phase}{}",
        text(locale, "day", "dia"),
        economy.day,
        text(locale, "score", "puntos"),
        economy.score,
        economy.goal,
        text(locale, "coins", "monedas"),
        economy.coins_remaining,
        economy.coins_max,
        if run.end_turn_active() { "" } else { " (busy)" }
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use orchard_core::{AnimationHandle, EventBus, GameConfig, SymbolId};

    #[test]
    fn board_has_a_line_per_row() {
        let run = RunState::new(GameConfig::default(), Catalog::builtin(), 1);
        let board = render_board(&run);
        assert_eq!(board.lines().count(), 9);
    }

    #[test]
    fn status_reads_the_economy() {
        let mut run = RunState::new(GameConfig::default(), Catalog::builtin(), 1);
        run.new_game(&mut EventBus::default()).expect("game starts");
        assert_eq!(
            render_status(&run, Locale::En),
            "day 1 | score 0/50 | coins 5/5 | playing"
        );
    }

    #[test]
    fn events_use_localized_names() {
        let catalog = Catalog::builtin();
        let event = Event::SymbolDestroyed {
            id: SymbolId(4),
            key: "cherry".to_string(),
            cause: DestroyCause::Evicted,
            animation: AnimationHandle(9),
        };
        assert_eq!(
            format_event(&event, &catalog, Locale::Es),
            "destruido Cereza #4 (expulsado) [anim 9]"
        );
    }
}
