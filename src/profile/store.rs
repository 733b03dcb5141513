//! Loading and validation of the candidate data directory

use crate::error::{Result, ResumeCuratorError};
use crate::job::normalize_terms;
use crate::metrics;
use crate::profile::model::{
    Bullet, CandidateProfile, DateRange, Education, Experience, Metadata, Project,
};
use serde::Deserialize;
use std::path::Path;

/// Loads the four candidate documents (`experiences.json`, `education.json`,
/// `projects.json`, `metadata.json`) into a typed, validated profile.
///
/// Validation is collect-all: the returned `Validation` error lists every
/// violated field, not just the first one found.
pub struct ProfileStore;

const REQUIRED_FILES: [&str; 4] = [
    "experiences.json",
    "education.json",
    "projects.json",
    "metadata.json",
];

impl ProfileStore {
    pub fn load(root: &Path) -> Result<CandidateProfile> {
        if !root.is_dir() {
            return Err(ResumeCuratorError::InvalidInput(format!(
                "Candidate data directory not found: {}",
                root.display()
            )));
        }

        let mut problems = Vec::new();
        for file in REQUIRED_FILES {
            if !root.join(file).exists() {
                problems.push(format!("{}: required file not found", file));
            }
        }
        if !problems.is_empty() {
            return Err(ResumeCuratorError::Validation(problems));
        }

        let experiences: RawExperiences = read_document(root, "experiences.json")?;
        let education: RawEducation = read_document(root, "education.json")?;
        let projects: RawProjects = read_document(root, "projects.json")?;
        let metadata: RawMetadata = read_document(root, "metadata.json")?;

        let mut builder = ProfileBuilder::default();
        let profile = builder.build(experiences, education, projects, metadata);

        if builder.problems.is_empty() {
            Ok(profile)
        } else {
            Err(ResumeCuratorError::Validation(builder.problems))
        }
    }
}

fn read_document<T: serde::de::DeserializeOwned>(root: &Path, file: &str) -> Result<T> {
    let content = std::fs::read_to_string(root.join(file))?;
    serde_json::from_str(&content).map_err(|e| {
        ResumeCuratorError::Validation(vec![format!("{}: malformed document: {}", file, e)])
    })
}

// Raw shapes keep every field optional so one bad record cannot mask the
// violations in the records after it.

#[derive(Deserialize)]
struct RawExperiences {
    #[serde(default)]
    work_experience: Vec<RawExperience>,
    #[serde(default)]
    internship_experience: Vec<RawExperience>,
    #[serde(default)]
    competitions: Vec<RawExperience>,
}

#[derive(Deserialize)]
struct RawExperience {
    company: Option<String>,
    // competitions carry a `name` instead of company/title
    name: Option<String>,
    title: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    #[serde(default)]
    bullets: Vec<RawBullet>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    frameworks: Vec<String>,
    #[serde(default)]
    tools: Vec<String>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawBullet {
    Text(String),
    Full {
        text: Option<String>,
        cost: Option<i64>,
        #[serde(default)]
        tags: Vec<String>,
    },
}

#[derive(Deserialize)]
struct RawEducation {
    #[serde(default)]
    university_education: Vec<RawEducationEntry>,
    #[serde(default)]
    high_school_education: Vec<RawEducationEntry>,
    #[serde(default)]
    other_education: Vec<RawEducationEntry>,
}

#[derive(Deserialize)]
struct RawEducationEntry {
    school: Option<String>,
    degree: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    grade: Option<String>,
    #[serde(default)]
    courses: Vec<String>,
}

#[derive(Deserialize)]
struct RawProjects {
    #[serde(default)]
    projects: Vec<RawProject>,
}

#[derive(Deserialize)]
struct RawProject {
    name: Option<String>,
    description: Option<String>,
    start_date: Option<String>,
    end_date: Option<String>,
    #[serde(default)]
    bullets: Vec<RawBullet>,
    #[serde(default)]
    languages: Vec<String>,
    #[serde(default)]
    frameworks: Vec<String>,
    #[serde(default)]
    tools: Vec<String>,
}

#[derive(Deserialize)]
struct RawMetadata {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    location: Option<String>,
    linkedin: Option<String>,
    github: Option<String>,
    website: Option<String>,
    #[serde(default)]
    spoken_languages: Vec<String>,
    #[serde(default)]
    extracurriculars: Vec<String>,
}

#[derive(Default)]
struct ProfileBuilder {
    problems: Vec<String>,
}

impl ProfileBuilder {
    fn build(
        &mut self,
        experiences: RawExperiences,
        education: RawEducation,
        projects: RawProjects,
        metadata: RawMetadata,
    ) -> CandidateProfile {
        let mut all_experiences = Vec::new();
        for (group, entries, is_competition) in [
            ("work_experience", experiences.work_experience, false),
            (
                "internship_experience",
                experiences.internship_experience,
                false,
            ),
            ("competitions", experiences.competitions, true),
        ] {
            for (idx, raw) in entries.into_iter().enumerate() {
                let path = format!("experiences.{}[{}]", group, idx);
                all_experiences.push(self.experience(raw, &path, is_competition));
            }
        }

        let mut all_education = Vec::new();
        for (group, entries) in [
            ("university_education", education.university_education),
            ("high_school_education", education.high_school_education),
            ("other_education", education.other_education),
        ] {
            for (idx, raw) in entries.into_iter().enumerate() {
                let path = format!("education.{}[{}]", group, idx);
                all_education.push(self.education(raw, &path));
            }
        }

        let mut all_projects = Vec::new();
        for (idx, raw) in projects.projects.into_iter().enumerate() {
            let path = format!("projects.projects[{}]", idx);
            all_projects.push(self.project(raw, &path));
        }

        let metadata = self.metadata(metadata);

        CandidateProfile {
            experiences: all_experiences,
            education: all_education,
            projects: all_projects,
            metadata,
        }
    }

    fn experience(&mut self, raw: RawExperience, path: &str, is_competition: bool) -> Experience {
        let (company, title) = if is_competition {
            (
                self.required(raw.name, &format!("{}.name", path)),
                "Competition".to_string(),
            )
        } else {
            (
                self.required(raw.company, &format!("{}.company", path)),
                self.required(raw.title, &format!("{}.title", path)),
            )
        };

        let dates = self.dates(raw.start_date, raw.end_date, path);
        let bullets = self.bullets(raw.bullets, path);
        let tags = merged_tags(raw.languages, raw.frameworks, raw.tools);

        Experience {
            company,
            title,
            dates,
            bullets,
            tags,
        }
    }

    fn education(&mut self, raw: RawEducationEntry, path: &str) -> Education {
        Education {
            school: self.required(raw.school, &format!("{}.school", path)),
            degree: self.required(raw.degree, &format!("{}.degree", path)),
            dates: self.dates(raw.start_date, raw.end_date, path),
            grade: raw.grade,
            courses: raw.courses,
        }
    }

    fn project(&mut self, raw: RawProject, path: &str) -> Project {
        Project {
            name: self.required(raw.name, &format!("{}.name", path)),
            description: raw.description.unwrap_or_default(),
            dates: self.dates(raw.start_date, raw.end_date, path),
            bullets: self.bullets(raw.bullets, path),
            tags: merged_tags(raw.languages, raw.frameworks, raw.tools),
        }
    }

    fn metadata(&mut self, raw: RawMetadata) -> Metadata {
        Metadata {
            name: self.required(raw.name, "metadata.name"),
            email: raw.email,
            phone: raw.phone,
            location: raw.location,
            linkedin: raw.linkedin,
            github: raw.github,
            website: raw.website,
            spoken_languages: raw.spoken_languages,
            extracurriculars: raw.extracurriculars,
        }
    }

    fn bullets(&mut self, raw: Vec<RawBullet>, path: &str) -> Vec<Bullet> {
        raw.into_iter()
            .enumerate()
            .map(|(idx, raw)| {
                let bullet_path = format!("{}.bullets[{}]", path, idx);
                match raw {
                    RawBullet::Text(text) => {
                        if text.trim().is_empty() {
                            self.problems.push(format!("{}.text: must not be empty", bullet_path));
                        }
                        Bullet::new(text)
                    }
                    RawBullet::Full { text, cost, tags } => {
                        let text = self.required(text, &format!("{}.text", bullet_path));
                        let computed = metrics::text_lines(&text);
                        let cost = match cost {
                            Some(cost) if cost < 0 => {
                                self.problems.push(format!(
                                    "{}.cost: must be non-negative (got {})",
                                    bullet_path, cost
                                ));
                                computed
                            }
                            Some(cost) => cost as u32,
                            None => computed,
                        };
                        Bullet {
                            text,
                            cost,
                            tags: normalize_terms(tags),
                        }
                    }
                }
            })
            .collect()
    }

    fn dates(&mut self, start: Option<String>, end: Option<String>, path: &str) -> DateRange {
        let start = self.required(start, &format!("{}.start_date", path));
        let range = DateRange { start, end };

        let start_year = range.start_year();
        if !range.start.is_empty() && start_year.is_none() {
            self.problems.push(format!(
                "{}.start_date: no recognizable year in {:?}",
                path, range.start
            ));
        }
        if !range.is_ongoing() {
            match (start_year, range.end_year()) {
                (_, None) => self.problems.push(format!(
                    "{}.end_date: no recognizable year in {:?}",
                    path,
                    range.end.as_deref().unwrap_or_default()
                )),
                (Some(start), Some(end)) if start > end => self.problems.push(format!(
                    "{}: start_date {} is after end_date {}",
                    path, start, end
                )),
                _ => {}
            }
        }
        range
    }

    fn required(&mut self, value: Option<String>, path: &str) -> String {
        match value {
            Some(value) if !value.trim().is_empty() => value,
            Some(_) => {
                self.problems.push(format!("{}: must not be empty", path));
                String::new()
            }
            None => {
                self.problems.push(format!("{}: missing required field", path));
                String::new()
            }
        }
    }
}

fn merged_tags(languages: Vec<String>, frameworks: Vec<String>, tools: Vec<String>) -> Vec<String> {
    let mut tags = languages;
    tags.extend(frameworks);
    tags.extend(tools);
    normalize_terms(tags)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn write_fixture(dir: &TempDir, file: &str, content: &str) {
        fs::write(dir.path().join(file), content).unwrap();
    }

    fn valid_dir() -> TempDir {
        let dir = TempDir::new().unwrap();
        write_fixture(
            &dir,
            "experiences.json",
            r#"{
                "work_experience": [{
                    "company": "Acme",
                    "title": "Engineer",
                    "start_date": "2021",
                    "end_date": "Present",
                    "bullets": ["Built the billing system in Rust"],
                    "languages": ["Rust"],
                    "frameworks": [],
                    "tools": ["Docker"]
                }],
                "competitions": [{
                    "name": "Advent of Code",
                    "start_date": "2022",
                    "end_date": "2022",
                    "bullets": [{"text": "Top 100 finish", "cost": 1}]
                }]
            }"#,
        );
        write_fixture(
            &dir,
            "education.json",
            r#"{"university_education": [{
                "school": "State University",
                "degree": "BSc Computer Science",
                "start_date": "2016",
                "end_date": "2020",
                "courses": ["Algorithms"]
            }]}"#,
        );
        write_fixture(
            &dir,
            "projects.json",
            r#"{"projects": [{
                "name": "ray tracer",
                "description": "Physically based renderer",
                "start_date": "2023",
                "end_date": "2023",
                "bullets": ["Implemented BVH acceleration"],
                "languages": ["Rust"]
            }]}"#,
        );
        write_fixture(
            &dir,
            "metadata.json",
            r#"{"name": "Jane Doe", "email": "jane@example.com", "phone": "555-0100",
                "location": "Berlin", "spoken_languages": ["English"],
                "extracurriculars": ["Volunteer coding mentor"]}"#,
        );
        dir
    }

    #[test]
    fn test_load_valid_profile() {
        let dir = valid_dir();
        let profile = ProfileStore::load(dir.path()).unwrap();

        assert_eq!(profile.experiences.len(), 2);
        assert_eq!(profile.experiences[0].company, "Acme");
        assert!(profile.experiences[0].dates.is_ongoing());
        assert_eq!(profile.experiences[0].tags, vec!["rust", "docker"]);
        assert_eq!(profile.experiences[1].title, "Competition");
        assert_eq!(profile.education.len(), 1);
        assert_eq!(profile.projects.len(), 1);
        assert_eq!(profile.metadata.name, "Jane Doe");
    }

    #[test]
    fn test_missing_files_all_reported() {
        let dir = TempDir::new().unwrap();
        write_fixture(&dir, "metadata.json", r#"{"name": "Jane"}"#);

        let err = ProfileStore::load(dir.path()).unwrap_err();
        match err {
            ResumeCuratorError::Validation(problems) => {
                assert_eq!(problems.len(), 3);
                assert!(problems.iter().any(|p| p.contains("experiences.json")));
                assert!(problems.iter().any(|p| p.contains("education.json")));
                assert!(problems.iter().any(|p| p.contains("projects.json")));
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_collects_every_violation() {
        let dir = valid_dir();
        write_fixture(
            &dir,
            "experiences.json",
            r#"{"work_experience": [
                {"title": "Engineer", "start_date": "2021", "end_date": "2020",
                 "bullets": [{"text": "Did things", "cost": -3}]},
                {"company": "Beta", "title": "Dev", "start_date": "someday"}
            ]}"#,
        );

        let err = ProfileStore::load(dir.path()).unwrap_err();
        match err {
            ResumeCuratorError::Validation(problems) => {
                assert!(problems.iter().any(|p| p.contains("[0].company")));
                assert!(problems.iter().any(|p| p.contains("start_date 2021 is after")));
                assert!(problems.iter().any(|p| p.contains("cost: must be non-negative")));
                assert!(problems.iter().any(|p| p.contains("[1].start_date")));
                assert!(problems.len() >= 4);
            }
            other => panic!("expected Validation, got {:?}", other),
        }
    }

    #[test]
    fn test_explicit_cost_overrides_estimate() {
        let dir = valid_dir();
        write_fixture(
            &dir,
            "projects.json",
            r#"{"projects": [{
                "name": "demo",
                "description": "",
                "start_date": "2023",
                "bullets": [{"text": "tiny", "cost": 7}]
            }]}"#,
        );

        let profile = ProfileStore::load(dir.path()).unwrap();
        assert_eq!(profile.projects[0].bullets[0].cost, 7);
    }

    #[test]
    fn test_missing_directory() {
        let err = ProfileStore::load(Path::new("/nonexistent/candidate")).unwrap_err();
        assert!(matches!(err, ResumeCuratorError::InvalidInput(_)));
    }
}
