use super::Population;
use crate::config::FoodModel;
use crate::error::Result;
use crozier_data::NestId;

impl Population {
    /// Brings the global stock up to date with the configured food model.
    pub(super) fn regenerate_food(&mut self) {
        let food = &self.config.food;
        match food.model {
            FoodModel::Constant => self.global_stock = food.constant_stock,
            FoodModel::Linear => {
                self.global_stock = self.global_stock.max(0.0)
                    + (self.time - self.clocks.food_regen) * food.regen_rate;
            }
            FoodModel::Periodic => {
                if self.time - self.clocks.food_tick >= food.tick_interval {
                    self.global_stock = food.init_food_stock;
                    self.clocks.food_tick = self.time;
                }
            }
        }
        self.clocks.food_regen = self.time;
    }

    /// Chance that a departing worker raids another nest instead of
    /// foraging: `(n - 1) / (stock + n - 1)` for `n` live nests.
    pub fn steal_probability(&self) -> f64 {
        let others = self.registry.len().saturating_sub(1) as f64;
        if others == 0.0 {
            return 0.0;
        }
        let denominator = self.global_stock + others;
        if denominator <= 0.0 {
            return 1.0;
        }
        (others / denominator).clamp(0.0, 1.0)
    }

    /// Uniformly random live nest other than `home`.
    pub(super) fn pick_target(&mut self, home: NestId) -> Result<NestId> {
        let nests = self.registry.as_slice();
        loop {
            let slot = self.rng.uniform_int(0, nests.len())?;
            if nests[slot].id != home {
                return Ok(nests[slot].id);
            }
        }
    }
}
