use std::str::FromStr;

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum EditOp {
    RemoveDuplicates,
    RemoveSpecials,
    RemoveOffline,
    RemoveShows(Vec<String>),
    SortShows,
    SortByDate,
    Shuffle(Option<(usize, usize)>),
    CyclicShuffle,
    BlockShuffle { count: usize, randomize: bool },
    Replicate(usize),
    ShuffleReplicate(usize),
    Equalize(Vec<(String, u32)>),
    Reruns {
        start_hour: u32,
        block_hours: u32,
        repeats: usize,
    },
    Night {
        start_hour: u32,
        end_hour: u32,
        channel: Option<u32>,
    },
    Breaks {
        after_minutes: u32,
        min_sec: u32,
        max_sec: u32,
    },
    Pad { minutes: u32, five: bool },
    SavePositions,
    RecoverPositions,
    Slide(i64),
    AddOffline(u32),
    AddRedirect { channel: u32, seconds: u32 },
    Wipe,
}

impl FromStr for EditOp {
    type Err = String;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let raw = raw.trim();
        let (name, args) = match raw.split_once('=') {
            Some((name, args)) => (name.trim(), Some(args.trim())),
            None => (raw, None),
        };

        let op = match (name, args) {
            ("remove-duplicates", None) => Self::RemoveDuplicates,
            ("remove-specials", None) => Self::RemoveSpecials,
            ("remove-offline", None) => Self::RemoveOffline,
            ("remove-shows", Some(args)) => {
                let ids: Vec<String> = split_args(args).map(str::to_string).collect();
                if ids.is_empty() {
                    return Err("remove-shows needs at least one show id".to_string());
                }
                Self::RemoveShows(ids)
            }
            ("sort-shows", None) => Self::SortShows,
            ("sort-by-date", None) => Self::SortByDate,
            ("shuffle", None) => Self::Shuffle(None),
            ("shuffle", Some(args)) => {
                let (lo, hi) = args
                    .split_once("..")
                    .ok_or_else(|| format!("shuffle range must look like LO..HI, got '{args}'"))?;
                Self::Shuffle(Some((number("LO", lo)?, number("HI", hi)?)))
            }
            ("cyclic-shuffle", None) => Self::CyclicShuffle,
            ("block-shuffle", Some(args)) => {
                let parts: Vec<&str> = split_args(args).collect();
                let randomize = match parts.get(1).copied() {
                    None => false,
                    Some("random") => true,
                    Some(other) => return Err(format!("unknown block-shuffle mode '{other}'")),
                };
                Self::BlockShuffle {
                    count: number("N", parts.first().copied().unwrap_or_default())?,
                    randomize,
                }
            }
            ("replicate", Some(args)) => Self::Replicate(number("N", args)?),
            ("shuffle-replicate", Some(args)) => Self::ShuffleReplicate(number("N", args)?),
            ("equalize", None) => Self::Equalize(Vec::new()),
            ("equalize", Some(args)) => {
                let mut weights = Vec::new();
                for pair in split_args(args) {
                    let (id, weight) = pair
                        .rsplit_once(':')
                        .ok_or_else(|| format!("weight must look like ID:W, got '{pair}'"))?;
                    weights.push((id.trim().to_string(), number("W", weight)?));
                }
                Self::Equalize(weights)
            }
            ("reruns", Some(args)) => {
                let [start, block, repeats] = fixed_args::<3>("reruns", args)?;
                Self::Reruns {
                    start_hour: hour("START_H", start)?,
                    block_hours: number("BLOCK_H", block)?,
                    repeats: number("REPEATS", repeats)?,
                }
            }
            ("night", Some(args)) => {
                let parts: Vec<&str> = split_args(args).collect();
                if !(2..=3).contains(&parts.len()) {
                    return Err("night takes START_H,END_H[,CHANNEL]".to_string());
                }
                Self::Night {
                    start_hour: hour("START_H", parts[0])?,
                    end_hour: hour("END_H", parts[1])?,
                    channel: parts
                        .get(2)
                        .map(|channel| number("CHANNEL", channel))
                        .transpose()?,
                }
            }
            ("breaks", Some(args)) => {
                let [after, min, max] = fixed_args::<3>("breaks", args)?;
                Self::Breaks {
                    after_minutes: number("AFTER_MIN", after)?,
                    min_sec: number("MIN_S", min)?,
                    max_sec: number("MAX_S", max)?,
                }
            }
            ("pad", Some(args)) => {
                let parts: Vec<&str> = split_args(args).collect();
                let five = match parts.get(1).copied() {
                    None => false,
                    Some("five") => true,
                    Some(other) => return Err(format!("unknown pad option '{other}'")),
                };
                Self::Pad {
                    minutes: number("MINUTES", parts.first().copied().unwrap_or_default())?,
                    five,
                }
            }
            ("save-positions", None) => Self::SavePositions,
            ("recover-positions", None) => Self::RecoverPositions,
            ("slide", Some(args)) => Self::Slide(number("MINUTES", args)?),
            ("add-offline", Some(args)) => Self::AddOffline(number("SECONDS", args)?),
            ("add-redirect", Some(args)) => {
                let [channel, seconds] = fixed_args::<2>("add-redirect", args)?;
                Self::AddRedirect {
                    channel: number("CHANNEL", channel)?,
                    seconds: number("SECONDS", seconds)?,
                }
            }
            ("wipe", None) => Self::Wipe,
            (name, Some(_)) if is_bare(name) => {
                return Err(format!("operation '{name}' takes no arguments"));
            }
            (name, None) if needs_args(name) => {
                return Err(format!("operation '{name}' needs arguments"));
            }
            (name, _) => return Err(format!("unknown operation '{name}'")),
        };
        Ok(op)
    }
}

const BARE_OPS: &[&str] = &[
    "remove-duplicates",
    "remove-specials",
    "remove-offline",
    "sort-shows",
    "sort-by-date",
    "cyclic-shuffle",
    "save-positions",
    "recover-positions",
    "wipe",
];

const ARG_OPS: &[&str] = &[
    "remove-shows",
    "block-shuffle",
    "replicate",
    "shuffle-replicate",
    "reruns",
    "night",
    "breaks",
    "pad",
    "slide",
    "add-offline",
    "add-redirect",
];

fn is_bare(name: &str) -> bool {
    BARE_OPS.contains(&name)
}

fn needs_args(name: &str) -> bool {
    ARG_OPS.contains(&name)
}

fn split_args(args: &str) -> impl Iterator<Item = &str> {
    args.split(',').map(str::trim).filter(|part| !part.is_empty())
}

fn fixed_args<'a, const N: usize>(op: &str, args: &'a str) -> Result<[&'a str; N], String> {
    let parts: Vec<&str> = split_args(args).collect();
    parts
        .try_into()
        .map_err(|parts: Vec<&str>| format!("{op} takes {N} arguments, got {}", parts.len()))
}

fn number<T: FromStr>(label: &str, raw: &str) -> Result<T, String> {
    raw.trim()
        .parse()
        .map_err(|_| format!("{label} must be a number, got '{}'", raw.trim()))
}

fn hour(label: &str, raw: &str) -> Result<u32, String> {
    let value: u32 = number(label, raw)?;
    if value >= 24 {
        return Err(format!("{label} must be an hour between 0 and 23, got {value}"));
    }
    Ok(value)
}
