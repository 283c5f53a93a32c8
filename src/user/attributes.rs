//! The four optional one-to-one attribute sets a profile can carry.
//!
//! Every set has a stored form (e.g. [`Demographics`]) and a patch form where
//! every field is optional (e.g. [`DemographicsPatch`]). A patch either
//! creates the set, in which case required fields must be present and
//! defaults fill the rest, or is applied field-by-field onto an existing set.
//! For optional fields the patch tells an absent field apart from an explicit
//! `null`, which clears the stored value.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::error::Error;

use super::UserProfile;

#[derive(Copy, Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "SCREAMING-KEBAB-CASE")]
pub enum AttributeKind {
    Demographics,
    Psychographics,
    Lifestyle,
    MediaPreferences,
}

pub trait AttributeSet: Sized {
    type Patch;

    const KIND: AttributeKind;

    fn from_patch(patch: Self::Patch) -> Result<Self, Error>;

    fn apply_patch(&mut self, patch: Self::Patch);
}

/// Patches the set in `slot` if it exists, otherwise creates it from the
/// patch. Does nothing when no patch was given.
pub fn update_or_create<T: AttributeSet>(
    slot: &mut Option<T>,
    patch: Option<T::Patch>,
) -> Result<(), Error> {
    let patch = match patch {
        Some(patch) => patch,
        None => return Ok(()),
    };

    match slot {
        Some(existing) => existing.apply_patch(patch),
        None => *slot = Some(T::from_patch(patch)?),
    }

    Ok(())
}

fn required<T: AttributeSet, V>(value: Option<V>, field: &'static str) -> Result<V, Error> {
    value.ok_or(Error::MissingAttributeField {
        attribute: T::KIND,
        field,
    })
}

fn patch_field<V>(target: &mut V, value: Option<V>) {
    if let Some(value) = value {
        *target = value;
    }
}

/// The attribute payloads of a create or update request.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct AttributePatches {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub demographics: Option<DemographicsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub psychographics: Option<PsychographicsPatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub lifestyle: Option<LifestylePatch>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_preferences: Option<MediaPreferencesPatch>,
}

impl AttributePatches {
    pub fn apply_to(self, user: &mut UserProfile) -> Result<(), Error> {
        update_or_create(&mut user.demographics, self.demographics)?;
        update_or_create(&mut user.psychographics, self.psychographics)?;
        update_or_create(&mut user.lifestyle, self.lifestyle)?;
        update_or_create(&mut user.media_preferences, self.media_preferences)?;

        Ok(())
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Demographics {
    pub age_range: String,
    pub gender_identity: String,
    pub language: String,
    pub country: String,
    pub region: Option<String>,
    pub location_type: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct DemographicsPatch {
    pub age_range: Option<String>,
    pub gender_identity: Option<String>,
    pub language: Option<String>,
    pub country: Option<String>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub region: Option<Option<String>>,
    pub location_type: Option<String>,
}

impl AttributeSet for Demographics {
    type Patch = DemographicsPatch;

    const KIND: AttributeKind = AttributeKind::Demographics;

    fn from_patch(patch: DemographicsPatch) -> Result<Demographics, Error> {
        Ok(Demographics {
            age_range: required::<Self, _>(patch.age_range, "age_range")?,
            gender_identity: required::<Self, _>(patch.gender_identity, "gender_identity")?,
            language: patch.language.unwrap_or_else(|| "English".to_string()),
            country: required::<Self, _>(patch.country, "country")?,
            region: patch.region.flatten(),
            location_type: required::<Self, _>(patch.location_type, "location_type")?,
        })
    }

    fn apply_patch(&mut self, patch: DemographicsPatch) {
        patch_field(&mut self.age_range, patch.age_range);
        patch_field(&mut self.gender_identity, patch.gender_identity);
        patch_field(&mut self.language, patch.language);
        patch_field(&mut self.country, patch.country);
        patch_field(&mut self.region, patch.region);
        patch_field(&mut self.location_type, patch.location_type);
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Psychographics {
    pub values: Vec<String>,
    pub motivations: Vec<String>,
    pub personality_traits: BTreeMap<String, i32>,
    pub decision_making_style: Option<String>,
    pub risk_tolerance: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct PsychographicsPatch {
    pub values: Option<Vec<String>>,
    pub motivations: Option<Vec<String>>,
    pub personality_traits: Option<BTreeMap<String, i32>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub decision_making_style: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub risk_tolerance: Option<Option<String>>,
}

impl AttributeSet for Psychographics {
    type Patch = PsychographicsPatch;

    const KIND: AttributeKind = AttributeKind::Psychographics;

    fn from_patch(patch: PsychographicsPatch) -> Result<Psychographics, Error> {
        Ok(Psychographics {
            values: patch.values.unwrap_or_default(),
            motivations: patch.motivations.unwrap_or_default(),
            personality_traits: patch.personality_traits.unwrap_or_default(),
            decision_making_style: patch.decision_making_style.flatten(),
            risk_tolerance: patch.risk_tolerance.flatten(),
        })
    }

    fn apply_patch(&mut self, patch: PsychographicsPatch) {
        patch_field(&mut self.values, patch.values);
        patch_field(&mut self.motivations, patch.motivations);
        patch_field(&mut self.personality_traits, patch.personality_traits);
        patch_field(&mut self.decision_making_style, patch.decision_making_style);
        patch_field(&mut self.risk_tolerance, patch.risk_tolerance);
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Lifestyle {
    pub occupation: Option<String>,
    pub industry: Option<String>,
    pub hobbies: Vec<String>,
    pub daily_environments: Vec<String>,
    pub tech_savviness: String,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct LifestylePatch {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub occupation: Option<Option<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub industry: Option<Option<String>>,
    pub hobbies: Option<Vec<String>>,
    pub daily_environments: Option<Vec<String>>,
    pub tech_savviness: Option<String>,
}

impl AttributeSet for Lifestyle {
    type Patch = LifestylePatch;

    const KIND: AttributeKind = AttributeKind::Lifestyle;

    fn from_patch(patch: LifestylePatch) -> Result<Lifestyle, Error> {
        Ok(Lifestyle {
            occupation: patch.occupation.flatten(),
            industry: patch.industry.flatten(),
            hobbies: patch.hobbies.unwrap_or_default(),
            daily_environments: patch.daily_environments.unwrap_or_default(),
            tech_savviness: patch
                .tech_savviness
                .unwrap_or_else(|| "average".to_string()),
        })
    }

    fn apply_patch(&mut self, patch: LifestylePatch) {
        patch_field(&mut self.occupation, patch.occupation);
        patch_field(&mut self.industry, patch.industry);
        patch_field(&mut self.hobbies, patch.hobbies);
        patch_field(&mut self.daily_environments, patch.daily_environments);
        patch_field(&mut self.tech_savviness, patch.tech_savviness);
    }
}

#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct MediaPreferences {
    pub preferred_platforms: Vec<String>,
    pub visual_style: Option<String>,
    pub music_preferences: Vec<String>,
    pub ad_duration_preference: Option<String>,
}

#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct MediaPreferencesPatch {
    pub preferred_platforms: Option<Vec<String>>,
    // older clients send the doubled name
    #[serde(alias = "visual_visual_style")]
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub visual_style: Option<Option<String>>,
    pub music_preferences: Option<Vec<String>>,
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_with::rust::double_option"
    )]
    pub ad_duration_preference: Option<Option<String>>,
}

impl AttributeSet for MediaPreferences {
    type Patch = MediaPreferencesPatch;

    const KIND: AttributeKind = AttributeKind::MediaPreferences;

    fn from_patch(patch: MediaPreferencesPatch) -> Result<MediaPreferences, Error> {
        Ok(MediaPreferences {
            preferred_platforms: patch.preferred_platforms.unwrap_or_default(),
            visual_style: patch.visual_style.flatten(),
            music_preferences: patch.music_preferences.unwrap_or_default(),
            ad_duration_preference: patch.ad_duration_preference.flatten(),
        })
    }

    fn apply_patch(&mut self, patch: MediaPreferencesPatch) {
        patch_field(&mut self.preferred_platforms, patch.preferred_platforms);
        patch_field(&mut self.visual_style, patch.visual_style);
        patch_field(&mut self.music_preferences, patch.music_preferences);
        patch_field(&mut self.ad_duration_preference, patch.ad_duration_preference);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn demographics_patch() -> DemographicsPatch {
        DemographicsPatch {
            age_range: Some("25-34".into()),
            gender_identity: Some("Female".into()),
            language: None,
            country: Some("USA".into()),
            region: None,
            location_type: Some("Urban".into()),
        }
    }

    #[test]
    fn creating_from_patch_fills_defaults() {
        let demographics = Demographics::from_patch(demographics_patch()).unwrap();
        assert_eq!(demographics.language, "English");
        assert_eq!(demographics.region, None);

        let lifestyle = Lifestyle::from_patch(LifestylePatch::default()).unwrap();
        assert_eq!(lifestyle.tech_savviness, "average");
        assert!(lifestyle.hobbies.is_empty());
    }

    #[test]
    fn creating_from_patch_requires_required_fields() {
        let patch = DemographicsPatch {
            country: None,
            ..demographics_patch()
        };

        assert_eq!(
            Demographics::from_patch(patch).unwrap_err(),
            Error::MissingAttributeField {
                attribute: AttributeKind::Demographics,
                field: "country",
            }
        );
    }

    #[test]
    fn update_or_create_patches_only_supplied_fields() {
        let mut slot = Some(Demographics::from_patch(demographics_patch()).unwrap());

        let patch = DemographicsPatch {
            region: Some(Some("Pacific Northwest".into())),
            ..Default::default()
        };
        update_or_create(&mut slot, Some(patch)).unwrap();

        let demographics = slot.unwrap();
        assert_eq!(demographics.region.as_deref(), Some("Pacific Northwest"));
        assert_eq!(demographics.age_range, "25-34");
        assert_eq!(demographics.country, "USA");
    }

    #[test]
    fn update_or_create_creates_missing_set() {
        let mut slot: Option<Psychographics> = None;

        let patch = PsychographicsPatch {
            values: Some(vec!["sustainability".into()]),
            ..Default::default()
        };
        update_or_create(&mut slot, Some(patch)).unwrap();

        let psychographics = slot.unwrap();
        assert_eq!(psychographics.values, vec!["sustainability".to_string()]);
        assert!(psychographics.personality_traits.is_empty());
    }

    #[test]
    fn update_or_create_ignores_absent_patch() {
        let mut slot: Option<Lifestyle> = None;

        update_or_create(&mut slot, None).unwrap();

        assert!(slot.is_none());
    }

    #[test]
    fn media_preferences_accept_legacy_visual_style_name() {
        let patch: MediaPreferencesPatch =
            serde_json::from_str(r#"{ "visual_visual_style": "Cinematic" }"#).unwrap();

        assert_eq!(patch.visual_style, Some(Some("Cinematic".to_string())));
    }

    #[test]
    fn explicit_null_clears_optional_field() {
        let mut slot = Some(Demographics::from_patch(demographics_patch()).unwrap());
        slot.as_mut().unwrap().region = Some("California".into());

        let patch: DemographicsPatch = serde_json::from_str(r#"{ "region": null }"#).unwrap();
        update_or_create(&mut slot, Some(patch)).unwrap();

        let demographics = slot.unwrap();
        assert_eq!(demographics.region, None);
        assert_eq!(demographics.country, "USA");
    }

    #[test]
    fn absent_optional_field_is_left_alone() {
        let mut slot = Some(Lifestyle::from_patch(LifestylePatch::default()).unwrap());
        slot.as_mut().unwrap().occupation = Some("Architect".into());

        let patch: LifestylePatch =
            serde_json::from_str(r#"{ "industry": null, "hobbies": ["climbing"] }"#).unwrap();
        update_or_create(&mut slot, Some(patch)).unwrap();

        let lifestyle = slot.unwrap();
        assert_eq!(lifestyle.occupation.as_deref(), Some("Architect"));
        assert_eq!(lifestyle.industry, None);
        assert_eq!(lifestyle.hobbies, vec!["climbing".to_string()]);
    }
}
