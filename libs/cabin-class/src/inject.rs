use cabin_core::FieldAccessFlags;

/// A field the runtime adds to a well known class for its own bookkeeping.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub struct InjectedField {
	pub name: &'static str,
	pub descriptor: &'static str,
}

impl InjectedField {
	pub const FLAGS: FieldAccessFlags = FieldAccessFlags::PRIVATE.union(FieldAccessFlags::SYNTHETIC);
}

const MEMBER_NAME: &[InjectedField] = &[InjectedField {
	// vtable index or offset of the resolved member
	name: "vmindex",
	descriptor: "I",
}];

const RESOLVED_METHOD_NAME: &[InjectedField] = &[
	InjectedField {
		name: "vmtarget",
		descriptor: "Ljava/lang/Object;",
	},
	InjectedField {
		name: "vmholder",
		descriptor: "Ljava/lang/Class;",
	},
];

/// Instance fields to add to the class with the given internal name.
pub fn injected_fields(class_name: &str) -> &'static [InjectedField] {
	match class_name {
		"java/lang/invoke/MemberName" => MEMBER_NAME,
		"java/lang/invoke/ResolvedMethodName" => RESOLVED_METHOD_NAME,
		_ => &[],
	}
}
