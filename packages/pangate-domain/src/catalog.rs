/// Category shortcut accepted by the catalog proxy in place of an explicit `type`/`tag` pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Category {
	Hot,
	Movie,
	Tv,
	Variety,
}
impl Category {
	/// Unknown shortcuts resolve to `None` and contribute nothing to the upstream query.
	pub fn parse(value: &str) -> Option<Self> {
		match value {
			"hot" => Some(Self::Hot),
			"movie" => Some(Self::Movie),
			"tv" => Some(Self::Tv),
			"variety" => Some(Self::Variety),
			_ => None,
		}
	}

	/// The fixed `(type, tag)` pair the shortcut stands for.
	pub fn subject(self) -> (&'static str, &'static str) {
		match self {
			Self::Hot | Self::Movie => ("movie", "热门"),
			Self::Tv => ("tv", "热门"),
			Self::Variety => ("tv", "综艺"),
		}
	}
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubjectFilter {
	pub kind: Option<String>,
	pub tag: Option<String>,
}
impl SubjectFilter {
	/// Explicit `type`/`tag` win; the category shortcut is consulted only when both are missing.
	pub fn resolve(kind: Option<&str>, tag: Option<&str>, category: Option<&str>) -> Self {
		let kind = kind.filter(|value| !value.is_empty());
		let tag = tag.filter(|value| !value.is_empty());

		if kind.is_none()
			&& tag.is_none()
			&& let Some(category) = category.and_then(Category::parse)
		{
			let (kind, tag) = category.subject();

			return Self { kind: Some(kind.to_string()), tag: Some(tag.to_string()) };
		}

		Self { kind: kind.map(str::to_string), tag: tag.map(str::to_string) }
	}
}
