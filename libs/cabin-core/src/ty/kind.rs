/// The storage category of a type, without the class behind references.
#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug)]
pub enum Kind {
	Boolean,
	Byte,
	Short,
	Int,
	Long,
	Char,
	Float,
	Double,
	Reference,
}

impl Kind {
	/// `long` and `double`.
	pub fn is_category_2(&self) -> bool {
		matches!(self, Kind::Double | Kind::Long)
	}

	/// Local variable or field slots a value of this kind takes.
	pub fn slots(&self) -> u8 {
		if self.is_category_2() {
			2
		} else {
			1
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn category_two() {
		assert!(Kind::Long.is_category_2());
		assert!(Kind::Double.is_category_2());
		assert!(!Kind::Int.is_category_2());
		assert!(!Kind::Float.is_category_2());
		assert!(!Kind::Reference.is_category_2());
		assert_eq!(Kind::Long.slots(), 2);
		assert_eq!(Kind::Reference.slots(), 1);
	}
}
