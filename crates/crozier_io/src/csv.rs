//! Tabular output: one CSV file per table, rows prefixed with the values of
//! the parameters listed in `output.record_params`.
//!
//! | File | Row |
//! |------|-----|
//! | `<run>_evolution.csv` | one [`PopulationSnapshot`] |
//! | `<run>_deadNests.csv` | one archived dead nest |
//! | `<run>_finState.csv` | the closing snapshot next to the last emitted one |
//! | `<run>_finIndividuals.csv` | one sampled live worker |

use crate::error::{IoError, Result};
use crozier_core::config::AppConfig;
use crozier_core::recorder::Recorder;
use crozier_data::{
    ActionCounters, DeadNestRecord, FinalState, IndividualRecord, MeanStd, PopulationSnapshot,
};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

const SNAPSHOT_STATS: &[&str] = &[
    "bc_nest_mean",
    "bc_nest_std",
    "bc_worker_mean",
    "bc_worker_std",
    "nest_shannon_mean",
    "nest_shannon_std",
    "nest_simpson_mean",
    "nest_simpson_std",
    "worker_shannon_mean",
    "worker_shannon_std",
    "worker_simpson_mean",
    "worker_simpson_std",
    "relatedness",
    "neutral_mean",
    "neutral_std",
    "intercept_mean",
    "intercept_std",
    "slope_mean",
    "slope_std",
    "cue_abundance_mean",
    "cue_abundance_std",
    "steals",
    "successful_steals",
    "departures",
    "successful_forages",
    "returns",
    "successful_returns",
    "food_returns",
    "offspring_mean",
    "offspring_std",
    "offspring_simpson",
    "offspring_shannon",
    "age_mean",
    "age_std",
    "max_age",
    "min_age",
];

const DEAD_NEST_COLUMNS: &[&str] = &[
    "time",
    "birth_time",
    "nest_id",
    "stock",
    "mother_id",
    "steals",
    "successful_steals",
    "departures",
    "successful_forages",
    "returns",
    "successful_returns",
    "raids_received",
    "successful_raids_received",
    "actions",
    "intercept",
    "slope",
    "offspring",
    "neutral_gene",
    "distance_to_population",
    "cause",
];

const INDIVIDUAL_COLUMNS: &[&str] = &[
    "nest_id",
    "individual_id",
    "birth_time",
    "next_action",
    "is_going",
    "is_foraging",
    "had_food",
    "neutral_gene",
];

/// Missing values are written as `NA`.
const MISSING: &str = "NA";

struct Table {
    path: PathBuf,
    writer: BufWriter<File>,
}

impl Table {
    fn create(path: PathBuf, header: &[String]) -> Result<Self> {
        let file = File::create(&path)
            .map_err(|e| IoError::from(e).at(&path))?;
        let mut table = Self {
            path,
            writer: BufWriter::new(file),
        };
        table.write_row(header)?;
        Ok(table)
    }

    fn write_row(&mut self, fields: &[String]) -> Result<()> {
        writeln!(self.writer, "{}", fields.join(","))
            .and_then(|_| self.writer.flush())
            .map_err(|e| IoError::from(e).at(&self.path))
    }
}

pub struct CsvRecorder {
    prefix: Vec<String>,
    evolution: Table,
    dead_nests: Table,
    final_state: Table,
    final_individuals: Table,
}

impl CsvRecorder {
    /// Creates `dir` if needed and opens the four tables of run `run_name`.
    pub fn create<P: AsRef<Path>>(dir: P, run_name: &str, config: &AppConfig) -> Result<Self> {
        if run_name.is_empty() {
            return Err(IoError::EmptyRunName);
        }
        let dir = dir.as_ref();
        std::fs::create_dir_all(dir)?;

        let names = config.output.record_params.clone();
        let prefix = names
            .iter()
            .map(|name| {
                config
                    .parameter(name)
                    .map(|v| render_value(&v))
                    .ok_or_else(|| IoError::UnknownParameter(name.clone()))
            })
            .collect::<Result<Vec<_>>>()?;
        let cue_columns: Vec<String> =
            (0..config.colony.cue_count).map(|i| format!("cue{i}")).collect();

        let evolution_header = header(&names, &["time", "global_stock", "alive_nests"], SNAPSHOT_STATS, &[]);
        let dead_header = header(&names, DEAD_NEST_COLUMNS, &[], &cue_columns);
        let final_header = header(
            &names,
            &[
                "time",
                "global_stock",
                "alive_nests",
                "last_time",
                "last_global_stock",
                "last_alive_nests",
            ],
            SNAPSHOT_STATS,
            &[],
        );
        let individual_header = header(&names, INDIVIDUAL_COLUMNS, &[], &cue_columns);

        Ok(Self {
            prefix,
            evolution: Table::create(dir.join(format!("{run_name}_evolution.csv")), &evolution_header)?,
            dead_nests: Table::create(dir.join(format!("{run_name}_deadNests.csv")), &dead_header)?,
            final_state: Table::create(dir.join(format!("{run_name}_finState.csv")), &final_header)?,
            final_individuals: Table::create(
                dir.join(format!("{run_name}_finIndividuals.csv")),
                &individual_header,
            )?,
        })
    }

    fn row(&self, fields: Vec<String>) -> Vec<String> {
        let mut row = self.prefix.clone();
        row.extend(fields);
        row
    }

    pub fn write_snapshot(&mut self, snapshot: &PopulationSnapshot) -> Result<()> {
        let mut fields = vec![
            num(snapshot.time),
            num(snapshot.global_stock),
            snapshot.alive_nests.to_string(),
        ];
        fields.extend(snapshot_stats(snapshot));
        let row = self.row(fields);
        self.evolution.write_row(&row)
    }

    pub fn write_dead_nests(&mut self, records: &[DeadNestRecord]) -> Result<()> {
        for record in records {
            let c = &record.counters;
            let mut fields = vec![
                num(record.flushed_at),
                num(record.birth_time),
                record.nest_id.to_string(),
                num(record.stock),
                record.mother_id.to_string(),
                c.steals.to_string(),
                c.successful_steals.to_string(),
                c.departures.to_string(),
                c.successful_forages.to_string(),
                c.returns.to_string(),
                c.successful_returns.to_string(),
                c.raids_received.to_string(),
                c.successful_raids_received.to_string(),
                c.actions.to_string(),
                num(record.intercept),
                num(record.slope),
                record.offspring.to_string(),
                num(record.neutral_gene),
                opt(record.distance_to_population),
                record.cause.as_str().to_string(),
            ];
            fields.extend(record.mean_cues.iter().map(|c| num(*c)));
            let row = self.row(fields);
            self.dead_nests.write_row(&row)?;
        }
        Ok(())
    }

    pub fn write_final_state(&mut self, state: &FinalState) -> Result<()> {
        let current = &state.current;
        let mut fields = vec![
            num(current.time),
            num(current.global_stock),
            current.alive_nests.to_string(),
        ];
        match &state.last_emitted {
            Some(last) => fields.extend([
                num(last.time),
                num(last.global_stock),
                last.alive_nests.to_string(),
            ]),
            None => fields.extend(std::iter::repeat(MISSING.to_string()).take(3)),
        }
        fields.extend(snapshot_stats(current));
        let row = self.row(fields);
        self.final_state.write_row(&row)?;

        for individual in &state.individuals {
            let row = self.row(individual_fields(individual));
            self.final_individuals.write_row(&row)?;
        }
        Ok(())
    }
}

impl Recorder for CsvRecorder {
    fn on_snapshot(&mut self, snapshot: &PopulationSnapshot) -> anyhow::Result<()> {
        Ok(self.write_snapshot(snapshot)?)
    }

    fn on_dead_nests(&mut self, _now: f64, records: &[DeadNestRecord]) -> anyhow::Result<()> {
        Ok(self.write_dead_nests(records)?)
    }

    fn on_finish(&mut self, state: &FinalState) -> anyhow::Result<()> {
        Ok(self.write_final_state(state)?)
    }
}

fn header(params: &[String], lead: &[&str], stats: &[&str], tail: &[String]) -> Vec<String> {
    params
        .iter()
        .cloned()
        .chain(lead.iter().chain(stats).map(|s| s.to_string()))
        .chain(tail.iter().cloned())
        .collect()
}

fn snapshot_stats(s: &PopulationSnapshot) -> Vec<String> {
    let mut fields = Vec::with_capacity(SNAPSHOT_STATS.len());
    let pair = |fields: &mut Vec<String>, m: &MeanStd| {
        fields.push(num(m.mean));
        fields.push(num(m.std));
    };
    pair(&mut fields, &s.nest_bray_curtis);
    pair(&mut fields, &s.worker_bray_curtis);
    pair(&mut fields, &s.nest_shannon);
    pair(&mut fields, &s.nest_simpson);
    pair(&mut fields, &s.worker_shannon);
    pair(&mut fields, &s.worker_simpson);
    fields.push(opt(s.relatedness));
    pair(&mut fields, &s.neutral_gene);
    pair(&mut fields, &s.intercept);
    pair(&mut fields, &s.slope);
    pair(&mut fields, &s.cue_abundance);
    fields.extend(counter_fields(&s.counters));
    pair(&mut fields, &s.offspring);
    fields.push(num(s.offspring_simpson));
    fields.push(num(s.offspring_shannon));
    pair(&mut fields, &s.age);
    fields.push(num(s.max_age));
    fields.push(num(s.min_age));
    fields
}

fn counter_fields(c: &ActionCounters) -> [String; 7] {
    [
        c.steals.to_string(),
        c.successful_steals.to_string(),
        c.departures.to_string(),
        c.successful_forages.to_string(),
        c.returns.to_string(),
        c.successful_returns.to_string(),
        c.food_returns.to_string(),
    ]
}

fn individual_fields(ind: &IndividualRecord) -> Vec<String> {
    let mut fields = vec![
        ind.nest_id.to_string(),
        ind.individual_id.to_string(),
        num(ind.birth_time),
        num(ind.next_action),
        u8::from(ind.is_going).to_string(),
        u8::from(ind.is_foraging).to_string(),
        u8::from(ind.had_food).to_string(),
        num(ind.neutral_gene),
    ];
    fields.extend(ind.cues.iter().map(|c| num(*c)));
    fields
}

fn num(v: f64) -> String {
    if v.is_finite() {
        v.to_string()
    } else {
        MISSING.to_string()
    }
}

fn opt(v: Option<f64>) -> String {
    v.map_or_else(|| MISSING.to_string(), num)
}

fn render_value(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Bool(b) => u8::from(*b).to_string(),
        serde_json::Value::Null => MISSING.to_string(),
        other => other.to_string(),
    }
}
