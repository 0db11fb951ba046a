//! Line-oriented front end over a live conversion session.

use std::str::FromStr;

use anyhow::Result;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;

use converter_session::{SessionEvent, SessionHandle, SessionSnapshot, SessionState};
use converter_types::{Amount, CurrencyCode};

const HELP: &str = "commands: amount <x> | from <code> | to <code> | swap | show | list | help | quit";

/// One parsed input line.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Amount(Amount),
    From(CurrencyCode),
    To(CurrencyCode),
    Swap,
    Show,
    List,
    Help,
    Quit,
}

impl FromStr for Command {
    type Err = String;

    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let mut parts = line.split_whitespace();
        let verb = parts.next().unwrap_or_default().to_lowercase();
        let arg = parts.next();
        if parts.next().is_some() {
            return Err(format!("too many arguments: {}", line.trim()));
        }

        let code = |arg: Option<&str>| -> Result<CurrencyCode, String> {
            arg.ok_or_else(|| format!("{} needs a currency code", verb))?
                .parse::<CurrencyCode>()
                .map_err(|e| e.to_string())
        };

        match verb.as_str() {
            "amount" | "a" => {
                let value: f64 = arg
                    .ok_or("amount needs a number")?
                    .parse()
                    .map_err(|_| format!("not a number: {}", arg.unwrap_or_default()))?;
                Amount::new(value)
                    .map(Command::Amount)
                    .map_err(|e| e.to_string())
            }
            "from" | "f" => code(arg).map(Command::From),
            "to" | "t" => code(arg).map(Command::To),
            "swap" | "s" => Ok(Command::Swap),
            "show" | "" => Ok(Command::Show),
            "list" | "ls" => Ok(Command::List),
            "help" | "?" => Ok(Command::Help),
            "quit" | "exit" | "q" => Ok(Command::Quit),
            other => Err(format!("unknown command: {}", other)),
        }
    }
}

/// Single status line for a snapshot.
pub fn render(snapshot: &SessionSnapshot) -> String {
    match &snapshot.state {
        SessionState::Idle => "Idle".to_string(),
        state if state.is_loading() => "Loading...".to_string(),
        SessionState::Error(message) => format!("Error: {}", message),
        _ => {
            let input = &snapshot.input;
            let result = snapshot
                .result
                .map(|r| r.to_string())
                .unwrap_or_else(|| "—".to_string());
            format!(
                "{} {} = {} {}",
                input.amount, input.from, result, input.to
            )
        }
    }
}

/// Picker listing: code, label and rate per line.
pub fn render_options(snapshot: &SessionSnapshot) -> String {
    let series = snapshot.series();
    snapshot
        .currency_options()
        .iter()
        .zip(series.iter())
        .map(|(option, point)| match &option.label {
            Some(label) => format!("{:<5} {:>14.4}  {}", option.code, point.rate, label),
            None => format!("{:<5} {:>14.4}", option.code, point.rate),
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Notices worth telling the user about, from events seen since the last prompt.
pub fn notices(events: &mut broadcast::Receiver<SessionEvent>) -> Vec<String> {
    let mut out = Vec::new();
    loop {
        match events.try_recv() {
            Ok(SessionEvent::TargetReassigned { previous, current }) => out.push(format!(
                "note: {} is not offered by the new rates, switched target to {}",
                previous, current
            )),
            Ok(_) | Err(broadcast::error::TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    out
}

/// Runs the prompt loop until `quit` or end of input.
pub async fn run(handle: SessionHandle) -> Result<()> {
    let mut events = handle.subscribe();
    handle.start().await?;
    println!("{}", HELP);
    println!("{}", render(&handle.settled().await?));

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let command = match line.parse::<Command>() {
            Ok(command) => command,
            Err(e) => {
                eprintln!("{}", e);
                continue;
            }
        };

        match command {
            Command::Quit => break,
            Command::Help => {
                println!("{}", HELP);
                continue;
            }
            Command::Amount(amount) => handle.set_amount(amount).await?,
            Command::From(code) => handle.set_from(code).await?,
            Command::To(code) => handle.set_to(code).await?,
            Command::Swap => handle.swap().await?,
            Command::Show => {}
            Command::List => {
                println!("{}", render_options(&handle.settled().await?));
                continue;
            }
        }

        let snapshot = handle.settled().await?;
        for notice in notices(&mut events) {
            println!("{}", notice);
        }
        println!("{}", render(&snapshot));
    }

    Ok(())
}
