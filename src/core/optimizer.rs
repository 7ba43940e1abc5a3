use crate::models::{ConflictSet, OptimizerConfig, ScoredCandidate, Team};
use crate::core::greedy::allocate_and_tag;
use crate::core::rng::RandomSource;
use crate::core::roles::RoleTable;
use crate::core::scoring::{experience_fraction, rank_order};
use std::cmp::Ordering;
use thiserror::Error;

const CAPACITY_FITNESS_WEIGHT: f64 = 0.4;
const EXPERIENCE_FITNESS_WEIGHT: f64 = 0.3;
const SCORE_FITNESS_WEIGHT: f64 = 0.3;

/// Rejected children allowed per population slot before the search gives up
const STALL_FACTOR: usize = 10;

/// Faults inside the evolutionary search; callers recover with the greedy team
#[derive(Debug, Error, Clone, PartialEq)]
pub enum OptimizerError {
    #[error("Invalid optimizer configuration: {0}")]
    InvalidConfig(String),

    #[error("Candidate pool is empty")]
    EmptyPool,

    #[error("No valid team could be sampled from {eligible} eligible candidates")]
    EmptyPopulation { eligible: usize },

    #[error("Child production stalled after {attempts} rejected children")]
    Stalled { attempts: usize },
}

impl OptimizerConfig {
    pub fn validate(&self) -> Result<(), OptimizerError> {
        if self.population_size == 0 {
            return Err(OptimizerError::InvalidConfig(
                "population_size must be at least 1".to_string(),
            ));
        }
        if self.elitism_count > self.population_size {
            return Err(OptimizerError::InvalidConfig(format!(
                "elitism_count {} exceeds population_size {}",
                self.elitism_count, self.population_size
            )));
        }
        if !(0.0..=1.0).contains(&self.mutation_rate) {
            return Err(OptimizerError::InvalidConfig(format!(
                "mutation_rate {} is outside [0, 1]",
                self.mutation_rate
            )));
        }
        if !self.min_score.is_finite() {
            return Err(OptimizerError::InvalidConfig(
                "min_score must be finite".to_string(),
            ));
        }
        Ok(())
    }
}

/// Evolutionary team search
///
/// Individuals are index lists into the scored pool. The greedy team, when
/// given, joins the initial population so elitism never loses it.
#[derive(Debug, Clone)]
pub struct PopulationOptimizer {
    config: OptimizerConfig,
    roles: RoleTable,
}

impl PopulationOptimizer {
    pub fn new(config: OptimizerConfig, roles: RoleTable) -> Self {
        Self { config, roles }
    }

    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    /// Search for the fittest team covering `capacity_needed`
    ///
    /// # Arguments
    /// * `scored` - The filtered, scored candidate pool
    /// * `capacity_needed` - Units/day the team must cover
    /// * `seed_team` - Baseline team injected into the initial population
    /// * `conflicts` - Candidate pairs that may not share a team
    /// * `rng` - Random source; seed it for reproducible results
    pub fn optimize<R: RandomSource + ?Sized>(
        &self,
        scored: &[ScoredCandidate],
        capacity_needed: u32,
        seed_team: Option<&Team>,
        conflicts: &ConflictSet,
        rng: &mut R,
    ) -> Result<Team, OptimizerError> {
        self.config.validate()?;

        if scored.is_empty() || capacity_needed == 0 {
            return Err(OptimizerError::EmptyPool);
        }

        let search = Search {
            pool: scored,
            capacity_needed,
            config: &self.config,
            conflicts,
        };

        let mut population = search.initial_population(seed_team, rng)?;
        let mut best_feasible = search.fittest(&population, true);

        for generation in 0..self.config.generations {
            population = search.next_generation(population, rng)?;
            if let Some(candidate) = search.fittest(&population, true) {
                if best_feasible.as_ref().map_or(true, |b| candidate.fitness > b.fitness) {
                    best_feasible = Some(candidate);
                }
            }
            tracing::trace!(
                "Generation {}: best fitness {:.4}",
                generation,
                population.first().map(|i| i.fitness).unwrap_or(0.0)
            );
        }

        // Final population first; an earlier feasible team beats an infeasible survivor
        let best = search
            .fittest(&population, true)
            .or(best_feasible)
            .or_else(|| search.fittest(&population, false))
            .ok_or(OptimizerError::EmptyPopulation { eligible: 0 })?;

        tracing::debug!(
            "Optimizer selected {} candidates with fitness {:.4}",
            best.genes.len(),
            best.fitness
        );

        let mut genes = search.truncate(&best.genes);
        genes.sort_by(|&a, &b| rank_order(&scored[a], &scored[b]));

        let ordered: Vec<&ScoredCandidate> = genes.iter().map(|&i| &scored[i]).collect();
        Ok(allocate_and_tag(&ordered, capacity_needed, &self.roles))
    }
}

impl Default for PopulationOptimizer {
    fn default() -> Self {
        Self::new(OptimizerConfig::default(), RoleTable::default())
    }
}

/// Fitness of a team against a capacity requirement
///
/// fitness = 0.4 * capacity coverage + 0.3 * mean experience + 0.3 * mean score / 100
pub fn team_fitness(members: &[&ScoredCandidate], capacity_needed: u32) -> f64 {
    if members.is_empty() || capacity_needed == 0 {
        return 0.0;
    }

    let count = members.len() as f64;
    let total: u64 = members
        .iter()
        .map(|m| m.candidate.capacity_numeric as u64)
        .sum();
    let coverage = (total as f64 / capacity_needed as f64).min(1.0);
    let experience = members
        .iter()
        .map(|m| experience_fraction(m.candidate.projects_completed))
        .sum::<f64>()
        / count;
    let avg_score = members.iter().map(|m| m.match_score).sum::<f64>() / count;

    CAPACITY_FITNESS_WEIGHT * coverage
        + EXPERIENCE_FITNESS_WEIGHT * experience
        + SCORE_FITNESS_WEIGHT * avg_score / 100.0
}

#[derive(Debug, Clone)]
struct Individual {
    genes: Vec<usize>,
    fitness: f64,
}

struct Search<'a> {
    pool: &'a [ScoredCandidate],
    capacity_needed: u32,
    config: &'a OptimizerConfig,
    conflicts: &'a ConflictSet,
}

impl<'a> Search<'a> {
    fn id(&self, gene: usize) -> &str {
        &self.pool[gene].candidate.id
    }

    fn capacity(&self, gene: usize) -> u64 {
        self.pool[gene].candidate.capacity_numeric as u64
    }

    fn raw_capacity(&self, genes: &[usize]) -> u64 {
        genes.iter().map(|&g| self.capacity(g)).sum()
    }

    fn individual(&self, genes: Vec<usize>) -> Individual {
        let members: Vec<&ScoredCandidate> = genes.iter().map(|&g| &self.pool[g]).collect();
        let fitness = team_fitness(&members, self.capacity_needed);
        Individual { genes, fitness }
    }

    fn conflicts_with(&self, gene: usize, genes: &[usize]) -> bool {
        self.conflicts
            .conflicts_with_any(self.id(gene), genes.iter().map(|&g| self.id(g)))
    }

    fn initial_population<R: RandomSource + ?Sized>(
        &self,
        seed_team: Option<&Team>,
        rng: &mut R,
    ) -> Result<Vec<Individual>, OptimizerError> {
        let eligible: Vec<usize> = (0..self.pool.len())
            .filter(|&i| {
                self.pool[i].match_score >= self.config.min_score
                    && self.pool[i].candidate.capacity_numeric > 0
            })
            .collect();

        let mut samples: Vec<Individual> = (0..self.config.population_size)
            .map(|_| self.sample(&eligible, rng))
            .filter(|genes| !genes.is_empty())
            .map(|genes| self.individual(genes))
            .collect();

        if samples.is_empty() {
            return Err(OptimizerError::EmptyPopulation {
                eligible: eligible.len(),
            });
        }

        if let Some(genes) = seed_team.and_then(|team| self.genes_for(team)) {
            samples.insert(0, self.individual(genes));
            samples.truncate(self.config.population_size);
        }

        Ok(samples)
    }

    /// Random sampling without replacement until the need is covered
    fn sample<R: RandomSource + ?Sized>(&self, eligible: &[usize], rng: &mut R) -> Vec<usize> {
        let mut remaining = eligible.to_vec();
        let mut genes = Vec::new();
        let mut capacity = 0u64;

        while capacity < self.capacity_needed as u64 && !remaining.is_empty() {
            let pick = remaining.swap_remove(rng.next_index(remaining.len()));
            if self.conflicts_with(pick, &genes) {
                continue;
            }
            capacity += self.capacity(pick);
            genes.push(pick);
        }

        genes
    }

    fn genes_for(&self, team: &Team) -> Option<Vec<usize>> {
        let genes: Vec<usize> = team
            .members
            .iter()
            .filter_map(|member| {
                self.pool
                    .iter()
                    .position(|s| s.candidate.id == member.id())
            })
            .collect();

        if genes.is_empty() {
            None
        } else {
            Some(genes)
        }
    }

    fn next_generation<R: RandomSource + ?Sized>(
        &self,
        mut population: Vec<Individual>,
        rng: &mut R,
    ) -> Result<Vec<Individual>, OptimizerError> {
        if population.is_empty() {
            return Err(OptimizerError::EmptyPopulation { eligible: 0 });
        }

        population.sort_by(|a, b| b.fitness.partial_cmp(&a.fitness).unwrap_or(Ordering::Equal));

        let elite = self.config.elitism_count.min(population.len());
        let mut next: Vec<Individual> = population[..elite].to_vec();

        let stall_limit = self.config.population_size * STALL_FACTOR;
        let mut rejected = 0usize;

        while next.len() < self.config.population_size {
            let first = roulette(&population, rng);
            let second = roulette(&population, rng);

            let mut child = self.crossover(&population[first].genes, &population[second].genes, rng);
            self.mutate(&mut child, rng);

            if child.is_empty() {
                rejected += 1;
                if rejected >= stall_limit {
                    return Err(OptimizerError::Stalled { attempts: rejected });
                }
                continue;
            }

            next.push(self.individual(child));
        }

        Ok(next)
    }

    /// Single-point crossover; duplicate or conflicting genes from the splice are dropped
    fn crossover<R: RandomSource + ?Sized>(&self, first: &[usize], second: &[usize], rng: &mut R) -> Vec<usize> {
        if first.is_empty() {
            return second.to_vec();
        }

        let cut = if first.len() > 1 {
            1 + rng.next_index(first.len() - 1)
        } else {
            1
        };

        let mut child: Vec<usize> = Vec::with_capacity(first.len().max(second.len()));
        for &gene in first[..cut].iter().chain(second.iter().skip(cut)) {
            if child.contains(&gene) || self.conflicts_with(gene, &child) {
                continue;
            }
            child.push(gene);
        }
        child
    }

    /// Per-position replacement with a random pool candidate
    fn mutate<R: RandomSource + ?Sized>(&self, child: &mut [usize], rng: &mut R) {
        for pos in 0..child.len() {
            if rng.next_f64() >= self.config.mutation_rate {
                continue;
            }

            let replacement = rng.next_index(self.pool.len());
            if child.contains(&replacement) || self.capacity(replacement) == 0 {
                continue;
            }

            let others: Vec<usize> = child
                .iter()
                .enumerate()
                .filter(|(i, _)| *i != pos)
                .map(|(_, &g)| g)
                .collect();
            if self.conflicts_with(replacement, &others) {
                continue;
            }

            child[pos] = replacement;
        }
    }

    /// Fittest individual, optionally restricted to those whose raw capacity meets the need
    fn fittest(&self, population: &[Individual], feasible_only: bool) -> Option<Individual> {
        let need = self.capacity_needed as u64;
        let mut best: Option<&Individual> = None;
        for individual in population {
            if feasible_only && self.raw_capacity(&individual.genes) < need {
                continue;
            }
            if best.map_or(true, |b| individual.fitness > b.fitness) {
                best = Some(individual);
            }
        }
        best.cloned()
    }

    /// Drop lowest-score members while the rest still covers the need
    fn truncate(&self, genes: &[usize]) -> Vec<usize> {
        let need = self.capacity_needed as u64;
        let mut total = self.raw_capacity(genes);
        let mut kept = genes.to_vec();

        if total <= need {
            return kept;
        }

        let mut weakest_first = genes.to_vec();
        weakest_first.sort_by(|&a, &b| rank_order(&self.pool[b], &self.pool[a]));

        for gene in weakest_first {
            let capacity = self.capacity(gene);
            if total - capacity >= need {
                total -= capacity;
                kept.retain(|&g| g != gene);
            }
        }

        kept
    }
}

/// Fitness-proportional parent selection; uniform when all fitness is zero
fn roulette<R: RandomSource + ?Sized>(population: &[Individual], rng: &mut R) -> usize {
    let total: f64 = population.iter().map(|i| i.fitness.max(0.0)).sum();
    if total <= 0.0 || !total.is_finite() {
        return rng.next_index(population.len());
    }

    let mut target = rng.next_f64() * total;
    for (idx, individual) in population.iter().enumerate() {
        target -= individual.fitness.max(0.0);
        if target < 0.0 {
            return idx;
        }
    }
    population.len() - 1
}
