//! The field catalog: every value the wizard offers for each question.
//!
//! Values are closed enumerations. Their string forms are the identifiers
//! stored in the collection; the `message` attribute carries the label shown
//! to users.

use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumMessage, EnumString, IntoEnumIterator, IntoStaticStr};

use crate::{error::ValidationError, heuristic::Field};

// ─── Option listing ──────────────────────────────────────────────────────────

/// One selectable value with its display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogOption {
  pub value: &'static str,
  pub label: &'static str,
}

/// List every variant of a catalog enumeration in declaration order.
pub fn options<E>() -> Vec<CatalogOption>
where
  E: IntoEnumIterator + EnumMessage + Into<&'static str>,
{
  E::iter()
    .map(|e| {
      let label = e.get_message().unwrap_or_default();
      CatalogOption { value: e.into(), label }
    })
    .collect()
}

// ─── Question 1: element ─────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
  EnumMessage, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ElementKind {
  #[strum(message = "Any Element")]
  Any,
  #[strum(message = "Text Component")]
  TextComponent,
  #[strum(message = "Button")]
  Button,
  #[strum(message = "Image")]
  Image,
  #[strum(message = "Container Box")]
  ContainerBox,
  #[strum(message = "Repeaters")]
  Repeaters,
  #[strum(message = "Lightbox")]
  Lightbox,
  #[strum(message = "Tabs")]
  Tabs,
  #[strum(message = "Accordion")]
  Accordion,
  #[strum(message = "Video Box")]
  VideoBox,
  #[strum(message = "Horizontal Line")]
  HorizontalLine,
  #[strum(message = "Vertical Line")]
  VerticalLine,
  #[strum(message = "Shape/SVG")]
  ShapeSvg,
  #[strum(message = "Social Bar")]
  SocialBar,
  #[strum(message = "Hamburger Menu")]
  HamburgerMenu,
  #[strum(message = "Logo Component")]
  LogoComponent,
  #[strum(message = "Google Maps")]
  GoogleMaps,
  #[strum(message = "Lottie Animation")]
  LottieAnimation,
}

// ─── Question 2: parent ──────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
  EnumMessage, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ParentKind {
  /// Sentinel meaning "any parent"; counts as a selection.
  #[strum(message = "Any Parent")]
  Any,
  #[strum(message = "Header")]
  Header,
  #[strum(message = "Section")]
  Section,
  #[strum(message = "Footer")]
  Footer,
  #[strum(message = "Container Box")]
  ContainerBox,
  #[strum(message = "System Container")]
  SystemContainer,
}

// ─── Question 3: category / subcategory ──────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
  EnumMessage, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Category {
  #[strum(message = "Layout")]
  Layout,
  #[strum(message = "Style")]
  Style,
  #[strum(message = "Behavioral")]
  Behavioral,
  #[strum(message = "Fonts")]
  Fonts,
}

impl Category {
  /// The subcategories valid under this category, in display order.
  pub fn subcategories(self) -> &'static [&'static str] {
    match self {
      Self::Layout => &["sizing", "spacing", "alignment", "pinned", "ooc"],
      Self::Style => &["colors", "backgrounds", "borders", "shadows", "effects"],
      Self::Behavioral => &["visibility", "rotation", "animation", "interaction"],
      Self::Fonts => &["font_algo", "font_size", "line_height", "letter_spacing"],
    }
  }

  pub fn contains(self, subcategory: &str) -> bool {
    self.subcategories().contains(&subcategory)
  }
}

/// Subcategories for a category given by its string form. Unknown categories
/// have none.
pub fn subcategories(category: &str) -> &'static [&'static str] {
  Category::from_str(category)
    .map(Category::subcategories)
    .unwrap_or_default()
}

/// Whether `subcategory` is listed under `category`.
pub fn is_valid_pair(category: &str, subcategory: &str) -> bool {
  Category::from_str(category).is_ok_and(|c| c.contains(subcategory))
}

// ─── Question 4: condition ───────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
  EnumMessage, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum ConditionKind {
  /// Sentinel meaning "always apply"; the condition value is unused.
  #[strum(message = "None (Always Apply)")]
  None,
  #[strum(message = "Desktop Width")]
  DesktopWidth,
  #[strum(message = "Desktop Height")]
  DesktopHeight,
  #[strum(message = "Desktop Font Size")]
  DesktopFontSize,
  #[strum(message = "Is Blank")]
  IsBlank,
  #[strum(message = "Contains Elements")]
  ContainsElements,
  #[strum(message = "Layout Type")]
  LayoutType,
  #[strum(message = "Element Position")]
  ElementIs,
  #[strum(message = "Component Above")]
  IsFirstComponentAbove,
  #[strum(message = "Rotation Value")]
  RotationValue,
  #[strum(message = "Aspect Ratio")]
  AspectRatio,
  #[strum(message = "Width Equals Parent")]
  WidthEqualsParent,
}

/// String form of [`ConditionKind::None`].
pub const CONDITION_NONE: &str = "none";

/// String form of [`ParentKind::Any`].
pub const PARENT_ANY: &str = "any";

// ─── Question 5: action ──────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString, EnumIter,
  EnumMessage, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
pub enum Action {
  #[strum(message = "Item Size")]
  ItemSize,
  #[strum(message = "Resize (Aspect)")]
  ResizeAspect,
  #[strum(message = "Container Item Resize")]
  ContainerItemResize,
  #[strum(message = "Margin")]
  Margin,
  #[strum(message = "Padding")]
  Padding,
  #[strum(message = "Font Size")]
  FontSize,
  #[strum(message = "Alignment")]
  Alignment,
  #[strum(message = "Vertical Arrange")]
  VerticalArrange,
  #[strum(message = "Show")]
  Show,
  #[strum(message = "Hide")]
  Hide,
  #[strum(message = "Keep")]
  Keep,
  #[strum(message = "Keep Value")]
  KeepValue,
  #[strum(message = "Offset Value")]
  OffsetValue,
  #[strum(message = "Set Rotation")]
  SetRotation,
  #[strum(message = "Menu Spacing")]
  MenuSpacing,
}

// ─── Status ──────────────────────────────────────────────────────────────────

/// Review status of a heuristic.
#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize,
  Display, EnumString, EnumIter, EnumMessage, IntoStaticStr,
)]
pub enum Status {
  #[default]
  #[strum(message = "Active")]
  Active,
  #[strum(message = "Pending")]
  Pending,
  #[strum(message = "Canceled")]
  Canceled,
}

impl Status {
  /// Parse the stored string form, mapping failure to a validation error.
  pub fn parse(value: &str) -> Result<Self, ValidationError> {
    Self::from_str(value).map_err(|_| ValidationError::UnknownValue {
      field: Field::Status,
      value: value.to_owned(),
    })
  }

  pub fn as_str(self) -> &'static str { self.into() }

  /// The status that follows this one when cycling through the options.
  pub fn cycle(self) -> Self {
    match self {
      Self::Active => Self::Pending,
      Self::Pending => Self::Canceled,
      Self::Canceled => Self::Active,
    }
  }
}

// ─── Validation ──────────────────────────────────────────────────────────────

fn check<E: FromStr>(field: Field, value: &str) -> Result<(), ValidationError> {
  E::from_str(value).map(|_| ()).map_err(|_| ValidationError::UnknownValue {
    field,
    value: value.to_owned(),
  })
}

/// Check `value` against the catalog for `field`.
///
/// `category` is the record's current category and is consulted only for
/// [`Field::Subcategory`]. Element and action must be non-empty. Every other
/// catalog field may be blank; condition value and output are free text.
pub fn validate(
  field: Field,
  value: &str,
  category: &str,
) -> Result<(), ValidationError> {
  match field {
    Field::ElementType | Field::Action if value.is_empty() => {
      Err(ValidationError::Missing(field))
    }
    Field::ElementType => check::<ElementKind>(field, value),
    Field::ParentType if value.is_empty() => Ok(()),
    Field::ParentType => check::<ParentKind>(field, value),
    Field::ConditionType if value.is_empty() => Ok(()),
    Field::ConditionType => check::<ConditionKind>(field, value),
    Field::Action => check::<Action>(field, value),
    Field::Category if value.is_empty() => Ok(()),
    Field::Category => check::<Category>(field, value),
    Field::Subcategory if value.is_empty() => Ok(()),
    Field::Subcategory if is_valid_pair(category, value) => Ok(()),
    Field::Subcategory => Err(ValidationError::SubcategoryMismatch {
      category:    category.to_owned(),
      subcategory: value.to_owned(),
    }),
    Field::Status => Status::parse(value).map(|_| ()),
    Field::ConditionValue | Field::OutputValue => Ok(()),
  }
}
