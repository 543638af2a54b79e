use anyhow::{bail, Context};
use chrono::Utc;
use dicebot::character::{CharacterStore, JsonCharacterStore, StoreError, UserId};
use dicebot::common::{AdvType, CritType};
use dicebot::roll::{MarkdownStringifier, Stringify};
use dicebot::{parse, parse_modifier, Config, RollContext, StatSystem};
use std::io::{self, BufRead, Write};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

const GUILD: u64 = 0;
const USER: UserId = 0;

const HELP: &str = "\
roll|r <expr>               roll dice, e.g. 1d20+1d4+2
adv|dis [modifier]          d20 check with advantage or disadvantage
stats [system]              generate ability scores
multiroll|m <n> <expr>      roll an expression n times
char create <name> <role>   create a character
char list                   list your characters
char show <name>            show a character sheet
char note <name> <text>     add a note
char notes <name> [page]    list notes
char delete <name>          delete a character
help                        this text";

struct Repl {
    config: Config,
    ctx: RollContext,
    store: JsonCharacterStore,
    md: MarkdownStringifier,
}

fn crit_flags(crits: impl Iterator<Item = CritType>) -> String {
    crits.map(|c| format!(" {}", c)).collect()
}

impl Repl {
    fn run(&mut self, line: &str) -> anyhow::Result<String> {
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        match cmd.to_lowercase().as_str() {
            "roll" | "r" => {
                let expr = parse(rest, self.config.limits())?;
                let roll = self.ctx.eval(&expr);
                let out = self.md.format(&roll);
                Ok(format!(
                    "{} = {}{}",
                    out.details,
                    self.md.str_total(out.total),
                    crit_flags(roll.crits())
                ))
            }
            cmd @ ("adv" | "dis") => {
                let adv = if cmd == "adv" { AdvType::Adv } else { AdvType::Dis };
                let roll = self.ctx.roll_d20(adv, parse_modifier(rest)?);
                Ok(format!(
                    "{}: {}{}",
                    adv,
                    self.md.str_d20(&roll),
                    crit_flags(std::iter::once(roll.crit()).filter(|c| !c.is_none()))
                ))
            }
            "stats" => {
                let system = if rest.is_empty() {
                    StatSystem::default()
                } else {
                    rest.parse()?
                };
                let block = self.ctx.stats(system);
                Ok(format!(
                    "{} ({})\n{}",
                    system,
                    system.description(),
                    self.md.str_stat_block(&block)
                ))
            }
            "multiroll" | "m" => {
                let (times, expr) = rest.split_once(' ').unwrap_or((rest, ""));
                let times = times
                    .parse()
                    .with_context(|| format!("{:?} is not a number of rolls", times))?;
                let expr = parse(expr, self.config.limits())?;
                let multi = self.ctx.repeat(&expr, times, self.config.max_multiroll)?;
                Ok(format!(
                    "{}x {}: {}\nsum {}, average {:.1}, min {}, max {}",
                    multi.rolls.len(),
                    expr,
                    self.md.str_totals(&multi),
                    multi.sum(),
                    multi.average(),
                    multi.min(),
                    multi.max()
                ))
            }
            "char" => self.character(rest),
            "help" | "" => Ok(HELP.to_owned()),
            other => bail!("unknown command {:?}; try `help`", other),
        }
    }

    fn character(&mut self, line: &str) -> anyhow::Result<String> {
        let (cmd, rest) = line.split_once(' ').unwrap_or((line, ""));
        let rest = rest.trim();
        let (name, arg) = rest.split_once(' ').unwrap_or((rest, ""));
        match cmd {
            "create" => {
                if name.is_empty() || arg.is_empty() {
                    bail!("usage: char create <name> <role>");
                }
                let roller = self.ctx.roller();
                let c = self
                    .store
                    .update(GUILD, |r| r.create(USER, name, arg, roller, Utc::now()))?;
                let stats: Vec<_> = c.stats.iter().map(|(k, v)| format!("{} {}", k, v)).collect();
                Ok(format!("created {} the {}: {}", c.name, c.role, stats.join(", ")))
            }
            "list" => {
                let roster = self.store.load(GUILD);
                let lines: Vec<_> = roster
                    .characters(USER)
                    .map(|(_, c)| format!("{} ({}, {})", c.name, c.role, c.system))
                    .collect();
                if lines.is_empty() {
                    Ok("no characters yet".to_owned())
                } else {
                    Ok(lines.join("\n"))
                }
            }
            "show" => {
                let roster = self.store.load(GUILD);
                let c = roster
                    .find(USER, rest)
                    .ok_or_else(|| StoreError::NotFound(rest.to_owned()))?;
                let mut out = format!("**{}** the {} [{}]", c.name, c.role, c.system);
                if let Some(nick) = &c.nickname {
                    out.push_str(&format!(" aka {}", nick));
                }
                for (label, value) in &c.stats {
                    out.push_str(&format!("\n{}: {}", label, value));
                }
                if let Some(backstory) = &c.backstory {
                    out.push_str(&format!("\n\n{}", backstory));
                }
                out.push_str(&format!("\n{} note(s)", c.notes.len()));
                Ok(out)
            }
            "note" => {
                let count = self
                    .store
                    .update(GUILD, |r| r.add_note(USER, name, arg))?;
                Ok(format!("note #{} added to {}", count, name))
            }
            "notes" => {
                let page = if arg.is_empty() {
                    1
                } else {
                    arg.parse()
                        .with_context(|| format!("{:?} is not a page number", arg))?
                };
                let roster = self.store.load(GUILD);
                let page = roster.notes_page(USER, name, page)?;
                let mut out = format!("page {}/{} ({} notes)", page.page, page.pages, page.total);
                for (i, note) in page.notes.iter().enumerate() {
                    out.push_str(&format!("\n{}. {}", page.first + i, note));
                }
                Ok(out)
            }
            "delete" => {
                let c = self.store.update(GUILD, |r| r.delete(USER, rest))?;
                Ok(format!("deleted {}", c.name))
            }
            _ => bail!("usage: char create|list|show|note|notes|delete ..."),
        }
    }
}

fn is_user_error(e: &anyhow::Error) -> bool {
    e.downcast_ref::<StoreError>()
        .map_or(true, StoreError::is_user_error)
}

fn main() -> anyhow::Result<()> {
    let config = Config::load().context("invalid configuration")?;

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_directive()))
        .context("invalid log level")?;
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(io::stderr))
        .init();

    let store = JsonCharacterStore::new(&config.data_dir)?;
    tracing::info!(data_dir = %config.data_dir.display(), "ready");

    let mut repl = Repl {
        config,
        ctx: RollContext::default(),
        store,
        md: MarkdownStringifier::new(),
    };

    let stdin = io::stdin();
    print!("> ");
    io::stdout().flush()?;
    for line in stdin.lock().lines() {
        let line = line?;
        match repl.run(line.trim()) {
            Ok(out) => println!("{}", out),
            Err(why) if is_user_error(&why) => {
                tracing::warn!(error = %why, "rejected command");
                eprintln!("Error: {:#}", why);
            }
            Err(why) => {
                tracing::error!(error = ?why, "command failed");
                eprintln!("Something went wrong: {:#}", why);
            }
        }
        print!("> ");
        io::stdout().flush()?;
    }
    Ok(())
}
