use std::collections::BTreeSet;
use std::fmt;

use super::loader::LoadError;

// ---------------------------------------------------------------------------
// CellValue – a single cell of the source table
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common Pandas dtypes.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    String(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::String(s) => write!(f, "{s}"),
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Null => write!(f, ""),
        }
    }
}

impl CellValue {
    /// Interpret the cell as a number. Booleans are not numbers here,
    /// matching `select_dtypes(include="number")`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    /// Integer value, accepting floats with no fractional part (`42.0`).
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            CellValue::Integer(i) => Some(*i),
            CellValue::Float(v) if v.fract() == 0.0 && v.is_finite() => Some(*v as i64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }

    /// Guess the type of a text cell: empty → Null, then integer, float,
    /// boolean, and finally plain string.
    pub fn infer(raw: &str) -> Self {
        let s = raw.trim();
        if s.is_empty() {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            return CellValue::Float(f);
        }
        if s == "true" || s == "false" {
            return CellValue::Bool(s == "true");
        }
        CellValue::String(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// Required fields
// ---------------------------------------------------------------------------

/// Categorical columns the dashboard groups by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoricalField {
    Attrition,
    BusinessTravel,
    Department,
    EducationField,
    Gender,
    JobRole,
}

impl CategoricalField {
    pub const ALL: [CategoricalField; 6] = [
        CategoricalField::Attrition,
        CategoricalField::BusinessTravel,
        CategoricalField::Department,
        CategoricalField::EducationField,
        CategoricalField::Gender,
        CategoricalField::JobRole,
    ];

    pub fn column_name(self) -> &'static str {
        match self {
            CategoricalField::Attrition => "Attrition",
            CategoricalField::BusinessTravel => "BusinessTravel",
            CategoricalField::Department => "Department",
            CategoricalField::EducationField => "EducationField",
            CategoricalField::Gender => "Gender",
            CategoricalField::JobRole => "JobRole",
        }
    }

    pub fn of(self, employee: &Employee) -> &str {
        match self {
            CategoricalField::Attrition => &employee.attrition,
            CategoricalField::BusinessTravel => &employee.business_travel,
            CategoricalField::Department => &employee.department,
            CategoricalField::EducationField => &employee.education_field,
            CategoricalField::Gender => &employee.gender,
            CategoricalField::JobRole => &employee.job_role,
        }
    }
}

/// Numeric columns the dashboard plots directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumericField {
    Age,
    MonthlyIncome,
    TotalWorkingYears,
    YearsAtCompany,
}

impl NumericField {
    pub fn column_name(self) -> &'static str {
        match self {
            NumericField::Age => "Age",
            NumericField::MonthlyIncome => "MonthlyIncome",
            NumericField::TotalWorkingYears => "TotalWorkingYears",
            NumericField::YearsAtCompany => "YearsAtCompany",
        }
    }

    pub fn of(self, employee: &Employee) -> f64 {
        match self {
            NumericField::Age => employee.age as f64,
            NumericField::MonthlyIncome => employee.monthly_income,
            NumericField::TotalWorkingYears => employee.total_working_years,
            NumericField::YearsAtCompany => employee.years_at_company,
        }
    }
}

// ---------------------------------------------------------------------------
// Employee – one row of the table
// ---------------------------------------------------------------------------

/// A single employee record with the required fields pulled out and typed.
#[derive(Debug, Clone, PartialEq)]
pub struct Employee {
    pub age: i64,
    pub attrition: String,
    pub business_travel: String,
    pub department: String,
    pub education_field: String,
    pub gender: String,
    pub job_role: String,
    pub monthly_income: f64,
    pub total_working_years: f64,
    pub years_at_company: f64,
    /// Every cell of the row, in file column order.
    pub cells: Vec<CellValue>,
}

// ---------------------------------------------------------------------------
// EmployeeDataset – the complete loaded table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Categorical,
}

/// The full parsed dataset with pre-computed column indices.
#[derive(Debug, Clone)]
pub struct EmployeeDataset {
    pub records: Vec<Employee>,
    /// Column names in file order.
    pub column_names: Vec<String>,
    /// Kind of each column, parallel to `column_names`.
    pub column_kinds: Vec<ColumnKind>,
    pub departments: BTreeSet<String>,
    pub attrition_labels: BTreeSet<String>,
    /// Observed (min, max) of Age, `None` for an empty table.
    pub age_bounds: Option<(i64, i64)>,
}

impl EmployeeDataset {
    /// Build a dataset from a raw table, validating the required columns.
    ///
    /// Every row must be as wide as the header. Required columns must be
    /// present and every required cell must hold a value of the right kind.
    pub fn from_table(
        column_names: Vec<String>,
        rows: Vec<Vec<CellValue>>,
    ) -> Result<Self, LoadError> {
        let position = |name: &'static str| -> Result<usize, LoadError> {
            column_names
                .iter()
                .position(|c| c == name)
                .ok_or(LoadError::MissingColumn(name))
        };

        let age_idx = position(NumericField::Age.column_name())?;
        let income_idx = position(NumericField::MonthlyIncome.column_name())?;
        let total_years_idx = position(NumericField::TotalWorkingYears.column_name())?;
        let company_years_idx = position(NumericField::YearsAtCompany.column_name())?;
        let mut cat_idx = [0usize; 6];
        for (slot, field) in cat_idx.iter_mut().zip(CategoricalField::ALL) {
            *slot = position(field.column_name())?;
        }

        let mut records = Vec::with_capacity(rows.len());
        for (row_no, cells) in rows.into_iter().enumerate() {
            if cells.len() != column_names.len() {
                return Err(LoadError::RowWidth {
                    row: row_no,
                    expected: column_names.len(),
                    found: cells.len(),
                });
            }

            let age = cells[age_idx].as_i64().ok_or_else(|| LoadError::InvalidValue {
                row: row_no,
                column: NumericField::Age.column_name(),
                expected: "an integer",
                found: cells[age_idx].to_string(),
            })?;
            let numeric = |idx: usize, field: NumericField| -> Result<f64, LoadError> {
                cells[idx].as_f64().ok_or_else(|| LoadError::InvalidValue {
                    row: row_no,
                    column: field.column_name(),
                    expected: "a number",
                    found: cells[idx].to_string(),
                })
            };
            let monthly_income = numeric(income_idx, NumericField::MonthlyIncome)?;
            let total_working_years = numeric(total_years_idx, NumericField::TotalWorkingYears)?;
            let years_at_company = numeric(company_years_idx, NumericField::YearsAtCompany)?;

            let mut labels: [String; 6] = Default::default();
            let label_columns = labels.iter_mut().zip(&cat_idx).zip(CategoricalField::ALL);
            for ((label, &idx), field) in label_columns {
                if cells[idx].is_null() {
                    return Err(LoadError::InvalidValue {
                        row: row_no,
                        column: field.column_name(),
                        expected: "a non-empty label",
                        found: String::new(),
                    });
                }
                *label = cells[idx].to_string();
            }
            let [attrition, business_travel, department, education_field, gender, job_role] =
                labels;

            records.push(Employee {
                age,
                attrition,
                business_travel,
                department,
                education_field,
                gender,
                job_role,
                monthly_income,
                total_working_years,
                years_at_company,
                cells,
            });
        }

        Ok(Self::from_records(column_names, records))
    }

    /// Build column indices from already-typed records.
    pub fn from_records(column_names: Vec<String>, records: Vec<Employee>) -> Self {
        let column_kinds = (0..column_names.len())
            .map(|col| {
                let mut saw_number = false;
                for rec in &records {
                    match rec.cells.get(col) {
                        Some(CellValue::Integer(_)) | Some(CellValue::Float(_)) => {
                            saw_number = true
                        }
                        Some(CellValue::Null) | None => {}
                        Some(_) => return ColumnKind::Categorical,
                    }
                }
                if saw_number {
                    ColumnKind::Numeric
                } else {
                    ColumnKind::Categorical
                }
            })
            .collect();

        let departments = records.iter().map(|r| r.department.clone()).collect();
        let attrition_labels = records.iter().map(|r| r.attrition.clone()).collect();
        let age_bounds = records.iter().map(|r| r.age).fold(None, |acc, age| match acc {
            None => Some((age, age)),
            Some((lo, hi)) => Some((lo.min(age), hi.max(age))),
        });

        EmployeeDataset {
            records,
            column_names,
            column_kinds,
            departments,
            attrition_labels,
            age_bounds,
        }
    }

    /// Indices of all numeric columns, in file order.
    pub fn numeric_columns(&self) -> Vec<usize> {
        self.column_kinds
            .iter()
            .enumerate()
            .filter(|(_, kind)| **kind == ColumnKind::Numeric)
            .map(|(i, _)| i)
            .collect()
    }

    /// Number of employees.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[cfg(test)]
pub(crate) mod fixtures {
    use super::*;

    pub const HEADER: [&str; 11] = [
        "Age",
        "Attrition",
        "BusinessTravel",
        "Department",
        "EducationField",
        "Gender",
        "JobRole",
        "MonthlyIncome",
        "TotalWorkingYears",
        "YearsAtCompany",
        "EmployeeCount",
    ];

    pub fn row(
        age: i64,
        department: &str,
        attrition: &str,
        income: f64,
        years: i64,
    ) -> Vec<CellValue> {
        vec![
            CellValue::Integer(age),
            CellValue::String(attrition.to_string()),
            CellValue::String("Travel_Rarely".to_string()),
            CellValue::String(department.to_string()),
            CellValue::String("Medical".to_string()),
            CellValue::String("Female".to_string()),
            CellValue::String("Analyst".to_string()),
            CellValue::Float(income),
            CellValue::Integer(years),
            CellValue::Integer(years / 2),
            CellValue::Integer(1),
        ]
    }

    pub fn dataset(rows: Vec<Vec<CellValue>>) -> EmployeeDataset {
        let header = HEADER.iter().map(|s| s.to_string()).collect();
        EmployeeDataset::from_table(header, rows).expect("fixture should be valid")
    }

    /// The three-record scenario: Age {25, 40, 60}, Sales / R&D / Sales.
    pub fn three_records() -> EmployeeDataset {
        dataset(vec![
            row(25, "Sales", "No", 3000.0, 4),
            row(40, "R&D", "Yes", 5000.0, 15),
            row(60, "Sales", "No", 9000.0, 35),
        ])
    }
}
