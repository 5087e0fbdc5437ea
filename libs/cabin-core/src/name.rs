use crate::PrimitiveType;

/// Converts a binary name (`java.lang.Object`) to the internal form (`java/lang/Object`).
pub fn to_internal(name: &str) -> String {
	name.replace('.', "/")
}

pub fn to_binary(name: &str) -> String {
	name.replace('/', ".")
}

/// Package of an internal name, `""` for the unnamed package.
///
/// Array names resolve to the package of their element class, primitive arrays live in no package.
pub fn package_of(name: &str) -> &str {
	let element = name.trim_start_matches('[');
	let element = match element.strip_prefix('L') {
		Some(class) if name.starts_with('[') => class.strip_suffix(';').unwrap_or(class),
		_ if name.starts_with('[') => return "",
		_ => element,
	};

	match element.rfind('/') {
		Some(end) => &element[..end],
		None => "",
	}
}

/// Whether `name` is a well formed internal name: `/` separated non empty segments, none of them `.` or `..`.
///
/// Array names are checked one dimension deep, their element class is checked when it is loaded.
pub fn is_valid_internal_name(name: &str) -> bool {
	if is_array(name) {
		return array_element(name).is_some();
	}

	!name.is_empty()
		&& name.split('/').all(|segment| {
			!segment.is_empty()
				&& segment != "."
				&& segment != ".."
				&& !segment.contains(&[';', '[', '\\'][..])
		})
}

pub fn is_array(name: &str) -> bool {
	name.starts_with('[')
}

/// The element of an array class name with one dimension stripped.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ArrayElement<'a> {
	Primitive(PrimitiveType),
	/// Internal name of a class, which may itself be an array.
	Class(&'a str),
}

impl<'a> ArrayElement<'a> {
	/// Name of the array class with this element.
	pub fn array_name(&self) -> String {
		match self {
			ArrayElement::Primitive(prim) => format!("[{}", prim.char()),
			ArrayElement::Class(name) if is_array(name) => format!("[{name}"),
			ArrayElement::Class(name) => format!("[L{name};"),
		}
	}
}

/// Strips one dimension from an array class name, `None` when the name is not a well formed array.
pub fn array_element(name: &str) -> Option<ArrayElement<'_>> {
	let component = name.strip_prefix('[')?;
	match component.as_bytes().first()? {
		b'[' => {
			// validate the rest of the nesting
			array_element(component)?;
			Some(ArrayElement::Class(component))
		}
		b'L' => {
			let class = component.strip_prefix('L')?.strip_suffix(';')?;
			if class.is_empty() || class.contains(';') || class.contains('[') {
				return None;
			}
			Some(ArrayElement::Class(class))
		}
		_ if component.len() == 1 => PrimitiveType::parse(component).map(ArrayElement::Primitive),
		_ => None,
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn internal_and_binary() {
		assert_eq!(to_internal("java.lang.Object"), "java/lang/Object");
		assert_eq!(to_binary("java/lang/Object"), "java.lang.Object");
		assert_eq!(to_internal("[Ljava.lang.String;"), "[Ljava/lang/String;");
	}

	#[test]
	fn packages() {
		assert_eq!(package_of("java/lang/Object"), "java/lang");
		assert_eq!(package_of("Main"), "");
		assert_eq!(package_of("[Ljava/util/List;"), "java/util");
		assert_eq!(package_of("[[Ljava/util/List;"), "java/util");
		assert_eq!(package_of("[I"), "");
	}

	#[test]
	fn elements() {
		assert_eq!(array_element("[I"), Some(ArrayElement::Primitive(PrimitiveType::Int)));
		assert_eq!(
			array_element("[Ljava/lang/String;"),
			Some(ArrayElement::Class("java/lang/String"))
		);
		assert_eq!(array_element("[[J"), Some(ArrayElement::Class("[J")));
		assert_eq!(array_element("java/lang/String"), None);
		assert_eq!(array_element("["), None);
		assert_eq!(array_element("[L;"), None);
		assert_eq!(array_element("[II"), None);
		assert_eq!(array_element("[[Q"), None);
	}

	#[test]
	fn valid_internal_names() {
		for name in ["java/lang/Object", "Main", "int", "[I", "[Ljava/lang/String;"] {
			assert!(is_valid_internal_name(name), "{name}");
		}
		for name in ["", "/tmp/x/Evil", "java/lang/", "java//lang", "a/../b", "./a", "a;b", "a\\b", "[Q"] {
			assert!(!is_valid_internal_name(name), "{name}");
		}
		assert!(!is_valid_internal_name(&to_internal(".tmp.x.Evil")));
	}

	#[test]
	fn element_names() {
		for name in ["[I", "[Ljava/lang/Object;", "[[D"] {
			assert_eq!(array_element(name).unwrap().array_name(), name);
		}
	}
}
