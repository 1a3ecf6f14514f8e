use anyhow::{Context, Result};
use chrono::{NaiveDate, NaiveDateTime, TimeDelta, Timelike};

/// Songs per broadcast hour.
const PER_HOUR: u32 = 12;

const SONGS: &[(&str, &str, u32)] = &[
    ("Bohemian Rhapsody", "Queen", 1975),
    ("Hotel California", "Eagles", 1977),
    ("Piano Man", "Billy Joel", 1974),
    ("Imagine", "John Lennon", 1971),
    ("Roller Coaster", "Danny Vera", 2019),
    ("Stairway To Heaven", "Led Zeppelin", 1971),
    ("Fix You", "Coldplay", 2005),
    ("Child In Time", "Deep Purple", 1972),
    ("Avond", "Boudewijn de Groot", 1997),
    ("Black", "Pearl Jam", 1991),
    ("Wish You Were Here", "Pink Floyd", 1975),
    ("Bridge Over Troubled Water", "Simon & Garfunkel", 1970),
    ("Nothing Else Matters", "Metallica", 1992),
    ("Purple Rain", "Prince", 1984),
    ("Als Het Golft", "De Dijk", 1994),
    ("Zij Gelooft In Mij", "André Hazes", 1981),
    ("Dancing Queen", "ABBA", 1976),
    ("Shallow", "Lady Gaga & Bradley Cooper", 2018),
];

/// `20.00 - 21.00`, with the occasional en dash or missing spaces seen in
/// hand-edited exports.
fn slot_label(hour: u32) -> String {
    let end = hour + 1;
    match hour % 10 {
        0 => format!("{hour:02}.00 \u{2013} {end:02}.00"),
        1 => format!("{hour:02}.00-{end:02}.00"),
        _ => format!("{hour:02}.00 - {end:02}.00"),
    }
}

/// Mostly `DD-MM-YYYY`, every fifth row ISO, as in mixed-origin spreadsheets.
fn date_label(moment: NaiveDateTime, position: u32) -> String {
    if position % 5 == 0 {
        moment.format("%Y-%m-%d").to_string()
    } else {
        moment.format("%d-%m-%Y").to_string()
    }
}

fn main() -> Result<()> {
    let output_path = "TOP2000-2025.csv";

    let start = NaiveDate::from_ymd_opt(2025, 12, 25)
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .context("start of the countdown")?;
    let gap = TimeDelta::minutes(60 / i64::from(PER_HOUR));

    let mut writer = csv::WriterBuilder::new()
        .delimiter(b';')
        .from_path(output_path)
        .with_context(|| format!("creating {output_path}"))?;
    writer.write_record(["Positie", "Titel", "Artiest", "Jaar", "Datum", "Tijdsvak", "Moment"])?;

    let mut moment = start;
    for position in (1..=2000u32).rev() {
        // Stride coprime with the list length, so neighbours differ.
        let (title, artist, year) = SONGS[(position as usize * 7) % SONGS.len()];
        // Upstream float coercion: positions and years arrive as `2000.0`.
        writer.write_record([
            format!("{position}.0"),
            title.to_string(),
            artist.to_string(),
            format!("{year}.0"),
            date_label(moment, position),
            slot_label(moment.hour()),
            moment.format("%d-%m-%Y %H:%M").to_string(),
        ])?;
        moment += gap;
    }
    writer.flush().context("flushing csv")?;

    println!("Wrote 2000 rows ({PER_HOUR} per hour from {start}) to {output_path}");
    Ok(())
}
