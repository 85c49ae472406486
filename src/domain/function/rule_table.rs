//! Discrete rule tables and qualitative rule matching.

use std::collections::BTreeSet;
use std::fmt;

use crate::domain::foundation::{Assignment, DexError, InputValue, Value, WILDCARD};
use crate::domain::model::AttributeDomain;

/// One cell of a rule row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Condition {
    /// Matches any value of the input attribute.
    Any,
    /// Matches the category with this rank.
    Is(usize),
}

impl Condition {
    fn matches(&self, rank: usize) -> bool {
        match self {
            Condition::Any => true,
            Condition::Is(r) => *r == rank,
        }
    }
}

/// The discrete mapping from input combinations to one output class.
///
/// Columns are stored per input attribute, one cell per rule row. Rows need
/// not be exhaustive nor mutually exclusive.
#[derive(Debug, Clone)]
pub struct RuleTable {
    name: String,
    output: AttributeDomain,
    inputs: Vec<AttributeDomain>,
    columns: Vec<Vec<Condition>>,
    results: Vec<usize>,
}

impl RuleTable {
    /// Builds a table from textual rule rows (`conditions`, `result`).
    ///
    /// Cells are category names of the matching input, or the wildcard token.
    pub fn from_rows(
        output: AttributeDomain,
        inputs: Vec<AttributeDomain>,
        rows: &[(Vec<String>, String)],
    ) -> Result<Self, DexError> {
        let name = output.attribute().to_string();
        if rows.is_empty() {
            return Err(DexError::EmptyRuleTable(name));
        }

        let mut columns = vec![Vec::with_capacity(rows.len()); inputs.len()];
        let mut results = Vec::with_capacity(rows.len());

        for (index, (cells, result)) in rows.iter().enumerate() {
            if cells.len() != inputs.len() {
                return Err(DexError::MalformedRule {
                    function: name,
                    rule: index,
                    expected: inputs.len(),
                    actual: cells.len(),
                });
            }
            for ((column, domain), cell) in columns.iter_mut().zip(&inputs).zip(cells) {
                let cell = cell.trim();
                let condition = if cell == WILDCARD {
                    Condition::Any
                } else {
                    Condition::Is(domain.rank_of(cell)?)
                };
                column.push(condition);
            }
            results.push(output.rank_of(result.trim())?);
        }

        Ok(Self {
            name,
            output,
            inputs,
            columns,
            results,
        })
    }

    /// Name of the function, which is its output attribute.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output(&self) -> &AttributeDomain {
        &self.output
    }

    pub fn inputs(&self) -> &[AttributeDomain] {
        &self.inputs
    }

    pub fn rule_count(&self) -> usize {
        self.results.len()
    }

    /// Condition of `row` for input column `input`.
    pub fn condition(&self, input: usize, row: usize) -> Condition {
        self.columns[input][row]
    }

    /// Output class rank of `row`.
    pub fn result(&self, row: usize) -> usize {
        self.results[row]
    }

    /// Indices of the rows matching every input of the assignment.
    pub fn matching_rows(&self, assignment: &Assignment) -> Result<Vec<usize>, DexError> {
        let mut matched: Option<BTreeSet<usize>> = None;

        for (column, domain) in self.columns.iter().zip(&self.inputs) {
            let value = assignment
                .get(domain.attribute())
                .ok_or_else(|| DexError::missing_input(&self.name, domain.attribute()))?;

            let rows = self.rows_matching_value(column, domain, value)?;
            matched = Some(match matched {
                None => rows,
                Some(acc) => acc.intersection(&rows).copied().collect(),
            });
        }

        let matched = matched.unwrap_or_else(|| (0..self.rule_count()).collect());
        if matched.is_empty() {
            return Err(DexError::no_matching_rule(&self.name));
        }
        Ok(matched.into_iter().collect())
    }

    fn rows_matching_value(
        &self,
        column: &[Condition],
        domain: &AttributeDomain,
        value: &InputValue,
    ) -> Result<BTreeSet<usize>, DexError> {
        let Some(values) = value.values() else {
            return Ok((0..column.len()).collect());
        };

        let mut rows = BTreeSet::new();
        for value in values {
            let rank = domain.rank_of(&domain.categorize(value)?)?;
            rows.extend(
                column
                    .iter()
                    .enumerate()
                    .filter(|(_, condition)| condition.matches(rank))
                    .map(|(row, _)| row),
            );
        }
        Ok(rows)
    }

    /// Qualitative evaluation: the distinct output classes of all matched rows,
    /// lowest rank first.
    pub fn evaluate(&self, assignment: &Assignment) -> Result<InputValue, DexError> {
        let classes: BTreeSet<usize> = self
            .matching_rows(assignment)?
            .into_iter()
            .map(|row| self.results[row])
            .collect();

        let values = classes
            .into_iter()
            .filter_map(|rank| self.output.scale().values().get(rank))
            .map(|v| Value::category(v.name.clone()))
            .collect();
        Ok(InputValue::from_values(values))
    }

    /// Every row with wildcard cells replaced by each category of the input.
    ///
    /// Returns `(input ranks, output rank)` pairs in table order.
    pub fn expanded_rows(&self) -> Vec<(Vec<usize>, usize)> {
        let mut expanded = Vec::with_capacity(self.rule_count());
        for row in 0..self.rule_count() {
            let mut partial: Vec<Vec<usize>> = vec![Vec::with_capacity(self.inputs.len())];
            for (column, domain) in self.columns.iter().zip(&self.inputs) {
                let ranks: Vec<usize> = match column[row] {
                    Condition::Any => (0..domain.len()).collect(),
                    Condition::Is(rank) => vec![rank],
                };
                partial = partial
                    .into_iter()
                    .flat_map(|prefix| {
                        ranks.iter().map(move |&rank| {
                            let mut next = prefix.clone();
                            next.push(rank);
                            next
                        })
                    })
                    .collect();
            }
            expanded.extend(partial.into_iter().map(|ranks| (ranks, self.results[row])));
        }
        expanded
    }

    /// Read-only textual view of the table for display.
    pub fn view(&self) -> RuleTableView {
        let rows = (0..self.rule_count())
            .map(|row| RuleRowView {
                conditions: self
                    .columns
                    .iter()
                    .zip(&self.inputs)
                    .map(|(column, domain)| match column[row] {
                        Condition::Any => WILDCARD.to_string(),
                        Condition::Is(rank) => domain.scale().values()[rank].name.clone(),
                    })
                    .collect(),
                result: self.output.scale().values()[self.results[row]].name.clone(),
            })
            .collect();

        RuleTableView {
            output: self.name.clone(),
            inputs: self.inputs.iter().map(|d| d.attribute().to_string()).collect(),
            rows,
        }
    }
}

/// Textual rows of a rule table.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RuleTableView {
    pub output: String,
    pub inputs: Vec<String>,
    pub rows: Vec<RuleRowView>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize)]
pub struct RuleRowView {
    pub conditions: Vec<String>,
    pub result: String,
}

impl fmt::Display for RuleTableView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{} | {}", self.inputs.join(" | "), self.output)?;
        for row in &self.rows {
            writeln!(f, "{} | {}", row.conditions.join(" | "), row.result)?;
        }
        Ok(())
    }
}
