use crozier_lib::model::config::AppConfig;
use crozier_lib::model::{Population, RandomSource};

#[allow(dead_code)]
pub struct PopulationBuilder {
    config: AppConfig,
    seed: u64,
}

#[allow(dead_code)]
impl PopulationBuilder {
    /// Small, fast population: 4 nests of 3 workers, horizon 20.
    pub fn new() -> Self {
        let mut config = AppConfig::default();
        config.colony.colony_count = 4;
        config.colony.worker_count = 3;
        config.colony.cue_count = 5;
        config.run.horizon = 20.0;
        config.output.output_interval = 5.0;
        config.demography.removal_interval = 10.0;
        Self { config, seed: 1 }
    }

    pub fn with_seed(mut self, seed: u64) -> Self {
        self.seed = seed;
        self
    }

    pub fn with_config<F>(mut self, modifier: F) -> Self
    where
        F: FnOnce(&mut AppConfig),
    {
        modifier(&mut self.config);
        self
    }

    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    pub fn build(self) -> Population {
        Population::new(self.config, RandomSource::from_seed(self.seed))
            .expect("Failed to create population in test builder")
    }
}
