//! Developer profiles with their experience and education histories.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::{
  Result,
  collection::{Entry, SubCollection},
  error::Error,
  validate::{date_field, valid_date},
};

// ─── Documents ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Social {
  pub youtube:   Option<String>,
  pub twitter:   Option<String>,
  pub facebook:  Option<String>,
  pub linkedin:  Option<String>,
  pub instagram: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Experience {
  pub experience_id: Uuid,
  pub title:         String,
  pub company:       String,
  pub location:      Option<String>,
  pub from:          NaiveDate,
  pub to:            Option<NaiveDate>,
  #[serde(default)]
  pub current:       bool,
  pub description:   Option<String>,
}

impl Entry for Experience {
  fn entry_id(&self) -> Uuid { self.experience_id }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Education {
  pub education_id: Uuid,
  pub school:       String,
  pub degree:       String,
  pub fieldofstudy: String,
  pub from:         NaiveDate,
  pub to:           NaiveDate,
  #[serde(default)]
  pub current:      bool,
  pub description:  Option<String>,
}

impl Entry for Education {
  fn entry_id(&self) -> Uuid { self.education_id }
}

/// A user's profile. There is at most one per user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
  pub profile_id:     Uuid,
  /// The owner.
  pub user:           Uuid,
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  pub status:         String,
  pub skills:         Vec<String>,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  #[serde(default)]
  pub social:         Social,
  #[serde(default)]
  pub experience:     SubCollection<Experience>,
  #[serde(default)]
  pub education:      SubCollection<Education>,
  pub created_at:     DateTime<Utc>,
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Body of `POST /profile`. Optional fields only overwrite when present.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct ProfileFields {
  pub company:        Option<String>,
  pub website:        Option<String>,
  pub location:       Option<String>,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Status is required"))]
  pub status:         String,
  /// Comma-separated list, e.g. `"rust, sql ,  go"`.
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Skills is required"))]
  pub skills:         String,
  pub bio:            Option<String>,
  pub githubusername: Option<String>,
  pub youtube:        Option<String>,
  pub twitter:        Option<String>,
  pub facebook:       Option<String>,
  pub linkedin:       Option<String>,
  pub instagram:      Option<String>,
}

/// Body of `PUT /profile/experience`. Dates arrive as strings and are only
/// parsed once the entry is built.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewExperience {
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Title is required"))]
  pub title:       String,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Company is required"))]
  pub company:     String,
  pub location:    Option<String>,
  #[serde(default, deserialize_with = "crate::validate::blank_as_none")]
  #[validate(
    required(message = "From date is required"),
    custom(function = "valid_date", message = "From date is invalid")
  )]
  pub from:        Option<String>,
  #[serde(default, deserialize_with = "crate::validate::blank_as_none")]
  #[validate(custom(function = "valid_date", message = "To date is invalid"))]
  pub to:          Option<String>,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  pub current:     bool,
  pub description: Option<String>,
}

/// Body of `PUT /profile/education`.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
pub struct NewEducation {
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "School is required"))]
  pub school:       String,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Degree is required"))]
  pub degree:       String,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  #[validate(length(min = 1, message = "Field of study is required"))]
  pub fieldofstudy: String,
  #[serde(default, deserialize_with = "crate::validate::blank_as_none")]
  #[validate(
    required(message = "From date is required"),
    custom(function = "valid_date", message = "From date is invalid")
  )]
  pub from:         Option<String>,
  #[serde(default, deserialize_with = "crate::validate::blank_as_none")]
  #[validate(
    required(message = "To date is required"),
    custom(function = "valid_date", message = "To date is invalid")
  )]
  pub to:           Option<String>,
  #[serde(default, deserialize_with = "crate::validate::null_as_default")]
  pub current:      bool,
  pub description:  Option<String>,
}

impl TryFrom<NewExperience> for Experience {
  type Error = Error;

  /// Build a stored entry under a fresh id. A missing or malformed `from`
  /// (or a malformed `to`) is rejected rather than defaulted.
  fn try_from(input: NewExperience) -> Result<Self> {
    Ok(Self {
      experience_id: Uuid::new_v4(),
      from:          date_field("from", input.from.as_deref())?,
      to:            input.to.as_deref().map(|to| date_field("to", Some(to))).transpose()?,
      title:         input.title,
      company:       input.company,
      location:      non_empty(input.location),
      current:       input.current,
      description:   non_empty(input.description),
    })
  }
}

impl TryFrom<NewEducation> for Education {
  type Error = Error;

  fn try_from(input: NewEducation) -> Result<Self> {
    Ok(Self {
      education_id: Uuid::new_v4(),
      from:         date_field("from", input.from.as_deref())?,
      to:           date_field("to", input.to.as_deref())?,
      school:       input.school,
      degree:       input.degree,
      fieldofstudy: input.fieldofstudy,
      current:      input.current,
      description:  non_empty(input.description),
    })
  }
}

/// Split a comma-separated skills string, trimming and dropping blanks.
pub fn parse_skills(raw: &str) -> Vec<String> {
  raw
    .split(',')
    .map(str::trim)
    .filter(|s| !s.is_empty())
    .map(str::to_owned)
    .collect()
}

fn non_empty(v: Option<String>) -> Option<String> { v.filter(|s| !s.is_empty()) }

// ─── Behaviour ───────────────────────────────────────────────────────────────

impl Profile {
  pub fn new(owner: Uuid, fields: ProfileFields) -> Self {
    let mut profile = Self {
      profile_id:     Uuid::new_v4(),
      user:           owner,
      company:        None,
      website:        None,
      location:       None,
      status:         String::new(),
      skills:         Vec::new(),
      bio:            None,
      githubusername: None,
      social:         Social::default(),
      experience:     SubCollection::new(),
      education:      SubCollection::new(),
      created_at:     Utc::now(),
    };
    profile.apply(fields);
    profile
  }

  /// Merge `fields` into this profile. Present values overwrite, absent ones
  /// are kept; the social block is always replaced as a whole.
  pub fn apply(&mut self, fields: ProfileFields) {
    let ProfileFields {
      company,
      website,
      location,
      status,
      skills,
      bio,
      githubusername,
      youtube,
      twitter,
      facebook,
      linkedin,
      instagram,
    } = fields;

    if let Some(v) = non_empty(company) {
      self.company = Some(v);
    }
    if let Some(v) = non_empty(website) {
      self.website = Some(v);
    }
    if let Some(v) = non_empty(location) {
      self.location = Some(v);
    }
    if !status.is_empty() {
      self.status = status;
    }
    if !skills.is_empty() {
      self.skills = parse_skills(&skills);
    }
    if let Some(v) = non_empty(bio) {
      self.bio = Some(v);
    }
    if let Some(v) = non_empty(githubusername) {
      self.githubusername = Some(v);
    }

    self.social = Social {
      youtube:   non_empty(youtube),
      twitter:   non_empty(twitter),
      facebook:  non_empty(facebook),
      linkedin:  non_empty(linkedin),
      instagram: non_empty(instagram),
    };
  }

  /// Prepend an experience entry.
  pub fn add_experience(&mut self, entry: Experience) -> &Experience {
    self.experience.push_front(entry)
  }

  /// Remove an experience entry. An unknown id is a no-op.
  pub fn remove_experience(&mut self, experience_id: Uuid) -> Option<Experience> {
    self.experience.remove(experience_id)
  }

  /// Prepend an education entry.
  pub fn add_education(&mut self, entry: Education) -> &Education {
    self.education.push_front(entry)
  }

  /// Remove an education entry. An unknown id is a no-op.
  pub fn remove_education(&mut self, education_id: Uuid) -> Option<Education> {
    self.education.remove(education_id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::{error::Error, validate::validated};

  fn fields(status: &str, skills: &str) -> ProfileFields {
    ProfileFields {
      status: status.into(),
      skills: skills.into(),
      ..Default::default()
    }
  }

  fn experience_input(title: &str) -> NewExperience {
    NewExperience {
      title:   title.into(),
      company: "Acme".into(),
      from:    Some("2020-01-01".into()),
      ..Default::default()
    }
  }

  fn experience(title: &str) -> Experience { Experience::try_from(experience_input(title)).unwrap() }

  fn education_input(school: &str) -> NewEducation {
    NewEducation {
      school:       school.into(),
      degree:       "BSc".into(),
      fieldofstudy: "CS".into(),
      from:         Some("2015-09-01".into()),
      to:           Some("2019-06-30".into()),
      ..Default::default()
    }
  }

  fn education(school: &str) -> Education { Education::try_from(education_input(school)).unwrap() }

  fn titles(p: &Profile) -> Vec<&str> {
    p.experience.iter().map(|e| e.title.as_str()).collect()
  }

  #[test]
  fn skills_are_split_and_trimmed() {
    assert_eq!(parse_skills(" rust,sql ,, go "), ["rust", "sql", "go"]);
  }

  #[test]
  fn apply_keeps_absent_fields_and_replaces_social() {
    let mut p = Profile::new(Uuid::new_v4(), ProfileFields {
      company: Some("Acme".into()),
      twitter: Some("@ada".into()),
      ..fields("Developer", "rust")
    });
    assert_eq!(p.social.twitter.as_deref(), Some("@ada"));

    p.apply(fields("Senior Developer", "rust, go"));
    assert_eq!(p.company.as_deref(), Some("Acme"));
    assert_eq!(p.status, "Senior Developer");
    assert_eq!(p.skills, ["rust", "go"]);
    assert_eq!(p.social, Social::default());
  }

  #[test]
  fn experience_is_newest_first_then_removed_by_id() {
    let mut p = Profile::new(Uuid::new_v4(), fields("Dev", "rust"));
    let a = p.add_experience(experience("A")).experience_id;
    let b = p.add_experience(experience("B")).experience_id;
    assert_ne!(a, b);
    assert_eq!(titles(&p), ["B", "A"]);

    assert_eq!(p.remove_experience(a).map(|e| e.title), Some("A".to_string()));
    assert_eq!(titles(&p), ["B"]);

    assert!(p.remove_experience(Uuid::new_v4()).is_none());
    assert_eq!(titles(&p), ["B"]);
  }

  #[test]
  fn many_entries_keep_distinct_ids_in_reverse_order() {
    let mut p = Profile::new(Uuid::new_v4(), fields("Dev", "rust"));
    let names: Vec<String> = (0..10).map(|i| format!("school-{i}")).collect();
    for n in &names {
      p.add_education(education(n));
    }

    let got: Vec<&str> = p.education.iter().map(|e| e.school.as_str()).collect();
    let want: Vec<&str> = names.iter().rev().map(String::as_str).collect();
    assert_eq!(got, want);

    let mut ids: Vec<Uuid> = p.education.iter().map(|e| e.education_id).collect();
    ids.sort();
    ids.dedup();
    assert_eq!(ids.len(), 10);
  }

  #[test]
  fn education_remove_unknown_leaves_entries() {
    let mut p = Profile::new(Uuid::new_v4(), fields("Dev", "rust"));
    p.add_education(education("first"));
    p.add_education(education("second"));
    let before = p.education.clone();
    assert!(p.remove_education(Uuid::new_v4()).is_none());
    assert_eq!(p.education, before);
  }

  #[test]
  fn experience_requires_title_company_and_from() {
    let err = validated(NewExperience::default()).unwrap_err();
    let Error::Validation(fields) = err else { panic!("expected validation error") };
    let params: Vec<_> = fields.iter().map(|f| f.param.as_str()).collect();
    assert_eq!(params, ["company", "from", "title"]);
  }

  #[test]
  fn education_requires_to_date() {
    let input = NewEducation { to: None, ..education_input("x") };
    let Err(Error::Validation(fields)) = validated(input) else {
      panic!("expected validation error");
    };
    assert_eq!(fields.len(), 1);
    assert_eq!(fields[0].msg, "To date is required");
  }

  #[test]
  fn blank_and_null_dates_read_as_missing() {
    for from in [serde_json::json!(""), serde_json::json!(null)] {
      let input: NewExperience = serde_json::from_value(serde_json::json!({
        "title": "A", "company": "Acme", "from": from
      }))
      .unwrap();
      let Err(Error::Validation(fields)) = validated(input) else {
        panic!("expected validation error for {from}");
      };
      assert_eq!(fields.len(), 1);
      assert_eq!(fields[0].msg, "From date is required");
    }
  }

  #[test]
  fn malformed_date_is_invalid() {
    let input = NewExperience { from: Some("last spring".into()), ..experience_input("A") };
    let Err(Error::Validation(fields)) = validated(input) else {
      panic!("expected validation error");
    };
    assert_eq!(fields[0].param, "from");
    assert_eq!(fields[0].msg, "From date is invalid");
  }

  #[test]
  fn entries_parse_their_dates() {
    let e = experience("A");
    assert_eq!(e.from, NaiveDate::from_ymd_opt(2020, 1, 1).unwrap());
    assert_eq!(e.to, None);

    let ed = education("MIT");
    assert_eq!(ed.to, NaiveDate::from_ymd_opt(2019, 6, 30).unwrap());
  }

  #[test]
  fn entry_without_from_is_never_built() {
    let input = NewExperience { from: None, ..experience_input("A") };
    assert!(matches!(Experience::try_from(input), Err(Error::Validation(_))));

    let input = NewEducation { to: None, ..education_input("x") };
    assert!(matches!(Education::try_from(input), Err(Error::Validation(_))));
  }

  #[test]
  fn profile_requires_status_and_skills() {
    assert!(validated(fields("", "")).is_err());
    assert!(validated(fields("Dev", "rust")).is_ok());
  }
}
