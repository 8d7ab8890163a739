use std::sync::Arc;

use arrow::array::{ArrayRef, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const EMPLOYEES: usize = 1470;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Uniform integer in `lo..=hi`.
    fn range(&mut self, lo: i64, hi: i64) -> i64 {
        lo + (self.next_f64() * (hi - lo + 1) as f64) as i64
    }

    /// Pick from `(value, weight)` pairs.
    fn weighted<'a>(&mut self, choices: &[(&'a str, f64)]) -> &'a str {
        let total: f64 = choices.iter().map(|c| c.1).sum();
        let mut target = self.next_f64() * total;
        for &(value, weight) in choices {
            if target < weight {
                return value;
            }
            target -= weight;
        }
        choices[choices.len() - 1].0
    }

    fn chance(&mut self, p: f64) -> bool {
        self.next_f64() < p
    }
}

enum ColumnData {
    Int(Vec<i64>),
    Text(Vec<String>),
}

struct Table {
    columns: Vec<(&'static str, ColumnData)>,
}

impl Table {
    fn int(&mut self, name: &'static str, values: Vec<i64>) {
        self.columns.push((name, ColumnData::Int(values)));
    }

    fn text(&mut self, name: &'static str, values: Vec<String>) {
        self.columns.push((name, ColumnData::Text(values)));
    }

    fn cell(&self, col: usize, row: usize) -> String {
        match &self.columns[col].1 {
            ColumnData::Int(v) => v[row].to_string(),
            ColumnData::Text(v) => v[row].clone(),
        }
    }
}

fn roles_for(department: &str) -> &'static [(&'static str, f64)] {
    match department {
        "Sales" => &[
            ("Sales Executive", 0.73),
            ("Sales Representative", 0.18),
            ("Manager", 0.09),
        ],
        "Human Resources" => &[("Human Resources", 0.82), ("Manager", 0.18)],
        _ => &[
            ("Research Scientist", 0.30),
            ("Laboratory Technician", 0.27),
            ("Manufacturing Director", 0.15),
            ("Healthcare Representative", 0.14),
            ("Research Director", 0.08),
            ("Manager", 0.06),
        ],
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);
    let n = EMPLOYEES;

    let mut age = Vec::with_capacity(n);
    let mut attrition = Vec::with_capacity(n);
    let mut travel = Vec::with_capacity(n);
    let mut department = Vec::with_capacity(n);
    let mut education_field = Vec::with_capacity(n);
    let mut gender = Vec::with_capacity(n);
    let mut job_level = Vec::with_capacity(n);
    let mut job_role = Vec::with_capacity(n);
    let mut marital = Vec::with_capacity(n);
    let mut income = Vec::with_capacity(n);
    let mut overtime = Vec::with_capacity(n);
    let mut total_years = Vec::with_capacity(n);
    let mut at_company = Vec::with_capacity(n);
    let mut in_role = Vec::with_capacity(n);
    let mut since_promotion = Vec::with_capacity(n);
    let mut with_manager = Vec::with_capacity(n);
    let mut job_satisfaction = Vec::with_capacity(n);

    for _ in 0..n {
        let a = rng.gauss(37.0, 9.0).round().clamp(18.0, 60.0) as i64;
        let dept = rng.weighted(&[
            ("Research & Development", 0.65),
            ("Sales", 0.30),
            ("Human Resources", 0.05),
        ]);
        let role = rng.weighted(roles_for(dept));
        let total = rng.range(0, (a - 18).min(40));
        let company = rng.range(0, total);
        let level = (1 + total / 8 + rng.range(0, 1)).min(5);
        let monthly = (level as f64 * 3200.0 + rng.gauss(0.0, 900.0)).max(1009.0).round() as i64;
        let ot = rng.chance(0.28);
        let satisfaction = rng.range(1, 4);
        let status = rng.weighted(&[("Married", 0.46), ("Single", 0.32), ("Divorced", 0.22)]);
        let trips = rng.weighted(&[
            ("Travel_Rarely", 0.71),
            ("Travel_Frequently", 0.19),
            ("Non-Travel", 0.10),
        ]);

        // Younger, junior, overtime-heavy and frequently travelling staff leave more.
        let mut p_leave: f64 = 0.06;
        if a < 30 {
            p_leave += 0.10;
        }
        if ot {
            p_leave += 0.15;
        }
        if level == 1 {
            p_leave += 0.08;
        }
        if trips == "Travel_Frequently" {
            p_leave += 0.07;
        }
        if status == "Single" {
            p_leave += 0.05;
        }
        p_leave -= 0.02 * (satisfaction - 1) as f64;

        age.push(a);
        attrition.push(if rng.chance(p_leave.clamp(0.01, 0.9)) { "Yes" } else { "No" }.to_string());
        travel.push(trips.to_string());
        department.push(dept.to_string());
        education_field.push(
            rng.weighted(&[
                ("Life Sciences", 0.41),
                ("Medical", 0.32),
                ("Marketing", 0.11),
                ("Technical Degree", 0.09),
                ("Other", 0.05),
                ("Human Resources", 0.02),
            ])
            .to_string(),
        );
        gender.push(rng.weighted(&[("Male", 0.6), ("Female", 0.4)]).to_string());
        job_level.push(level);
        job_role.push(role.to_string());
        marital.push(status.to_string());
        income.push(monthly);
        overtime.push(if ot { "Yes" } else { "No" }.to_string());
        total_years.push(total);
        at_company.push(company);
        in_role.push(rng.range(0, company.min(18)));
        since_promotion.push(rng.range(0, company.min(15)));
        with_manager.push(rng.range(0, company.min(17)));
        job_satisfaction.push(satisfaction);
    }

    let mut uniform =
        |lo: i64, hi: i64| -> Vec<i64> { (0..n).map(|_| rng.range(lo, hi)).collect() };

    let mut table = Table { columns: Vec::new() };
    table.int("Age", age);
    table.text("Attrition", attrition);
    table.text("BusinessTravel", travel);
    table.int("DailyRate", uniform(102, 1499));
    table.text("Department", department);
    table.int("DistanceFromHome", uniform(1, 29));
    table.int("Education", uniform(1, 5));
    table.text("EducationField", education_field);
    table.int("EmployeeCount", vec![1; n]);
    table.int("EmployeeNumber", (1..=n as i64).collect());
    table.int("EnvironmentSatisfaction", uniform(1, 4));
    table.text("Gender", gender);
    table.int("HourlyRate", uniform(30, 100));
    table.int("JobInvolvement", uniform(1, 4));
    table.int("JobLevel", job_level);
    table.text("JobRole", job_role);
    table.int("JobSatisfaction", job_satisfaction);
    table.text("MaritalStatus", marital);
    table.int("MonthlyIncome", income);
    table.int("MonthlyRate", uniform(2094, 26999));
    table.int("NumCompaniesWorked", uniform(0, 9));
    table.text("Over18", vec!["Y".to_string(); n]);
    table.text("OverTime", overtime);
    table.int("PercentSalaryHike", uniform(11, 25));
    table.int("PerformanceRating", uniform(3, 4));
    table.int("RelationshipSatisfaction", uniform(1, 4));
    table.int("StandardHours", vec![80; n]);
    table.int("StockOptionLevel", uniform(0, 3));
    table.int("TotalWorkingYears", total_years);
    table.int("TrainingTimesLastYear", uniform(0, 6));
    table.int("WorkLifeBalance", uniform(1, 4));
    table.int("YearsAtCompany", at_company);
    table.int("YearsInCurrentRole", in_role);
    table.int("YearsSinceLastPromotion", since_promotion);
    table.int("YearsWithCurrManager", with_manager);

    // Write CSV
    let csv_path = "EA.csv";
    let mut writer = csv::Writer::from_path(csv_path).expect("Failed to create CSV file");
    writer
        .write_record(table.columns.iter().map(|(name, _)| *name))
        .expect("Failed to write CSV header");
    for row in 0..n {
        let record: Vec<String> = (0..table.columns.len())
            .map(|col| table.cell(col, row))
            .collect();
        writer.write_record(&record).expect("Failed to write CSV row");
    }
    writer.flush().expect("Failed to flush CSV file");

    // Write Parquet
    let fields: Vec<Field> = table
        .columns
        .iter()
        .map(|(name, data)| match data {
            ColumnData::Int(_) => Field::new(*name, DataType::Int64, false),
            ColumnData::Text(_) => Field::new(*name, DataType::Utf8, false),
        })
        .collect();
    let schema = Arc::new(Schema::new(fields));
    let arrays: Vec<ArrayRef> = table
        .columns
        .into_iter()
        .map(|(_, data)| -> ArrayRef {
            match data {
                ColumnData::Int(v) => Arc::new(Int64Array::from(v)),
                ColumnData::Text(v) => Arc::new(StringArray::from(v)),
            }
        })
        .collect();

    let batch = RecordBatch::try_new(schema.clone(), arrays).expect("Failed to create RecordBatch");

    let parquet_path = "EA.parquet";
    let file = std::fs::File::create(parquet_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!("Wrote {n} employees to {csv_path} and {parquet_path}");
}
